pub mod password_token;
pub mod user;

pub use password_token::PasswordToken;
pub use user::User;
