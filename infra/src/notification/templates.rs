//! Message bodies for OTP delivery

pub const EMAIL_SUBJECT: &str = "Your OTP for HampyWorld";

pub fn sms_text(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Your HampyWorld verification code is: {}. Valid for {} minutes.",
        code, ttl_minutes
    )
}

pub fn email_html(code: &str, ttl_minutes: i64) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #8B4513; text-align: center;">HampyWorld</h1>
  <div style="background: #FFF8F0; padding: 30px; border-radius: 10px; text-align: center;">
    <h2>Your Verification Code</h2>
    <p style="font-size: 32px; font-weight: bold; color: #D97706; letter-spacing: 8px;">{code}</p>
    <p style="color: #666;">This code will expire in {ttl_minutes} minutes.</p>
  </div>
  <p style="color: #999; font-size: 12px; text-align: center; margin-top: 20px;">
    If you didn't request this code, please ignore this email.
  </p>
</div>"#
    )
}
