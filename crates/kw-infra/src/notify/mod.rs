pub mod http_mailer;
pub mod twilio_sms;

pub use http_mailer::{DisabledMailer, HttpApiMailer, MailerConfig};
pub use twilio_sms::{DisabledSmsSender, TwilioConfig, TwilioSmsSender};
