//! Notification formatter
//!
//! Renders transitions into an e-mail subject, a plain-text body and an HTML
//! body. Pure functions only.

use chrono::{DateTime, Utc};
use ytpm_common::{Tier, Transition, TransitionKind};

/// Maximum title length in a single-transition subject, in characters
pub const SUBJECT_TITLE_CHARS: usize = 50;

/// Rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Render a notification for `transitions`
pub fn render(transitions: &[Transition]) -> Notification {
    Notification {
        subject: subject(transitions),
        text: text_body(transitions),
        html: html_body(transitions),
    }
}

/// Synthetic transition used by `test-email` mode
pub fn test_transition(detected_at: DateTime<Utc>) -> Transition {
    Transition {
        kind: TransitionKind::BecameOpen,
        entry_id: "test123".to_string(),
        title: "Test Video - Member Content Now Free".to_string(),
        url: ytpm_common::models::watch_url("test123"),
        previous_tier: Some(Tier::Restricted),
        current_tier: Tier::Open,
        detected_at,
    }
}

fn subject(transitions: &[Transition]) -> String {
    match transitions {
        [single] => format!(
            "🎉 Member-only video became free: {}",
            truncate_chars(&single.title, SUBJECT_TITLE_CHARS)
        ),
        many => format!("🎉 {} member-only videos became free!", many.len()),
    }
}

/// Truncate to at most `max` characters, appending "..." when shortened
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Human-readable tier change
pub fn tier_change(transition: &Transition) -> String {
    let from = match transition.previous_tier {
        Some(tier) => tier.label(),
        None => "not listed",
    };
    format!("{} → {}", from, transition.current_tier.label())
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn text_body(transitions: &[Transition]) -> String {
    let mut body = String::from("The following member-only videos are now free to watch:\n\n");
    for (i, t) in transitions.iter().enumerate() {
        body.push_str(&format!(
            "{}. {}\n   Status: {}\n   Link: {}\n   Detected: {}\n\n",
            i + 1,
            t.title,
            tier_change(t),
            t.url,
            timestamp(&t.detected_at)
        ));
    }
    body.push_str("Sent by ytpm-monitor\n");
    body
}

fn html_body(transitions: &[Transition]) -> String {
    let mut items = String::new();
    for t in transitions {
        let url = escape_html(&t.url);
        items.push_str(&format!(
            "<li style=\"margin-bottom: 16px;\">\
             <a href=\"{url}\"><strong>{title}</strong></a><br>\
             <span>Status: {change}</span><br>\
             <span>Detected: {at}</span><br>\
             <a href=\"{url}\">{url}</a>\
             </li>",
            url = url,
            title = escape_html(&t.title),
            change = escape_html(&tier_change(t)),
            at = timestamp(&t.detected_at),
        ));
    }

    format!(
        "<!DOCTYPE html>\
         <html><head><meta charset=\"utf-8\"></head>\
         <body style=\"font-family: sans-serif;\">\
         <h2>🎉 Member-only videos are now free</h2>\
         <p>The following videos are now free to watch:</p>\
         <ol>{}</ol>\
         <p style=\"color: #888; font-size: 12px;\">Sent by ytpm-monitor</p>\
         </body></html>",
        items
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
