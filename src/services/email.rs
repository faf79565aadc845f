use log::info;

use crate::models::project::Project;

/// Seam for outbound mail: a recipient plus a pre-rendered subject/body
/// pair. The SMTP transport itself stays outside this crate; implementors
/// report success as a flag the caller surfaces to the user.
pub trait Mailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> bool;
}

/// Logs outgoing messages instead of dialing a relay. Keeps the reset and
/// assignment flows runnable offline.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        info!("mail to <{}>: {}\n{}", to, subject, body);
        true
    }
}

/// Subject/body pair for a password-reset code.
pub fn password_reset_message(otp: &str) -> (String, String) {
    let subject = String::from("Your ProCheck password reset code");
    let body = format!(
        "You recently requested a password reset for your ProCheck account.\n\
         Your verification code is: {}\n\n\
         This code will expire in 10 minutes. If you did not request a reset,\n\
         please ignore this message.",
        otp
    );
    (subject, body)
}

/// Subject/body pair telling an assignee they were added to a project.
pub fn assignment_message(project: &Project) -> (String, String) {
    let subject = format!(
        "[ProCheck] You have been assigned to project: {}",
        project.name
    );
    let body = format!(
        "You have been assigned to the project \"{}\".\n\
         Project ID: {}\n\
         Manager: {}\n\
         Status: {}\n\
         Start Date: {}\n\
         End Date: {}",
        project.name,
        project.project_id,
        project.manager,
        project.status,
        project.start_date,
        project.end_date,
    );
    (subject, body)
}
