pub fn render_password_reset(reset_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Password reset</h2>
    <p>A password reset was requested for your account.</p>
    <p><a href="{reset_url}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Reset Password</a></p>
    <p style="color: #666; font-size: 14px;">This link can only be used once and expires. If you didn't request it, you can ignore this email.</p>
</body>
</html>"#
    )
}
