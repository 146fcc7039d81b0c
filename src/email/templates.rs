//! Verification email content.

const SUBJECT: &str = "Verify your email address";

/// Subject plus HTML and plain-text bodies for a verification link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationEmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl VerificationEmailContent {
    #[must_use]
    pub fn new(verify_url: &str) -> Self {
        let url = escape_html(verify_url);
        let html = format!(
            r#"<h2>Welcome to Super30 Contest!</h2>
<p>Please click the link below to verify your email address:</p>
<a href="{url}" style="background-color: #4CAF50; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;">Verify Email</a>
<p>Or copy and paste this link in your browser:</p>
<p>{url}</p>
<p>This link will expire in 24 hours.</p>
"#
        );
        let text = format!(
            "Welcome to Super30 Contest!\n\n\
             Open the link below to verify your email address:\n\n\
             {verify_url}\n\n\
             This link will expire in 24 hours.\n"
        );

        Self {
            subject: SUBJECT.to_string(),
            html,
            text,
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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
