mod service_tests;
mod verify_tests;
