//! Reminder mail composition.
//!
//! Builds the subject, plain-text body, and HTML body from a task snapshot.
//! Kept separate from transport so composition is testable without any
//! delivery infrastructure.

use chrono::{DateTime, Utc};

use crate::task::Task;

/// Format a due time for display in mail bodies.
fn format_due(due: DateTime<Utc>) -> String {
    due.format("%A, %B %-d, %Y at %H:%M UTC").to_string()
}

/// Mail subject line for a task reminder.
pub fn subject(task: &Task) -> String {
    format!("Reminder: {}", task.title)
}

/// Plain-text body for clients that do not render HTML.
pub fn text_body(task: &Task, dashboard_url: &str) -> String {
    let mut body = String::new();
    body.push_str("Task Reminder\n\n");
    body.push_str("This is a reminder for your upcoming task:\n\n");
    body.push_str(&format!("Title: {}\n", task.title));
    if let Some(description) = &task.description {
        body.push_str(&format!("Description: {}\n", description));
    }
    if let Some(due) = task.due_at {
        body.push_str(&format!("Due: {}\n", format_due(due)));
    }
    body.push_str("\nThis task is due in approximately 30 minutes.\n");
    body.push_str(&format!("\nView it in your dashboard: {}/dashboard\n", dashboard_url));
    body
}

/// HTML body with the task snapshot and a dashboard link.
pub fn html_body(task: &Task, dashboard_url: &str) -> String {
    let description = task
        .description
        .as_deref()
        .map(|d| format!("<p class=\"task-desc\">{}</p>", escape(d)))
        .unwrap_or_default();
    let due = task
        .due_at
        .map(|d| format!("<p class=\"task-due\">Due: {}</p>", format_due(d)))
        .unwrap_or_default();

    format!(
        "<html><body>\
         <h1>Task Reminder</h1>\
         <p>Your task is coming up soon:</p>\
         <div class=\"task-box\">\
         <p class=\"task-title\">{title}</p>\
         {description}\
         {due}\
         </div>\
         <p><strong>This task is due in approximately 30 minutes.</strong></p>\
         <p><a href=\"{url}/dashboard\">View in Dashboard</a></p>\
         </body></html>",
        title = escape(&task.title),
        description = description,
        due = due,
        url = dashboard_url,
    )
}

/// Minimal HTML escaping for user-provided text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
