//! Email service for transactional mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Outbound
//! mail is optional: when SMTP is not configured the service is absent from
//! application state and callers skip sending.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the welcome email sent on first sign-in.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    name: &'a str,
    site_url: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    name: &'a str,
    site_url: &'a str,
}

/// HTML template for a contact form submission forwarded to the office inbox.
#[derive(Template)]
#[template(path = "email/contact_message.html")]
struct ContactMessageHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Plain text template for a contact form submission.
#[derive(Template)]
#[template(path = "email/contact_message.txt")]
struct ContactMessageText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// HTML template alerting admins that a testimonial awaits review.
#[derive(Template)]
#[template(path = "email/testimonial_alert.html")]
struct TestimonialAlertHtml<'a> {
    author: &'a str,
    content: &'a str,
}

/// Plain text template for the testimonial alert.
#[derive(Template)]
#[template(path = "email/testimonial_alert.txt")]
struct TestimonialAlertText<'a> {
    author: &'a str,
    content: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    contact_address: String,
    site_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be constructed.
    pub fn new(config: &EmailConfig, site_url: &str) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            contact_address: config.contact_address.clone(),
            site_url: site_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a welcome email after a user's first sign-in.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml {
            name,
            site_url: &self.site_url,
        }
        .render()?;
        let text = WelcomeEmailText {
            name,
            site_url: &self.site_url,
        }
        .render()?;

        self.send_multipart_email(to, "Welcome to Constructivo", &text, &html)
            .await
    }

    /// Forward a contact form submission to the office inbox.
    ///
    /// The visitor's address goes into `Reply-To` so staff can answer
    /// directly; `From` stays our own authenticated sender.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), EmailError> {
        let html = ContactMessageHtml { name, email, message }.render()?;
        let text = ContactMessageText { name, email, message }.render()?;

        let mail = Message::builder()
            .from(self.parse_address(&self.from_address)?)
            .reply_to(self.parse_address(email)?)
            .to(self.parse_address(&self.contact_address)?)
            .subject(format!("Contact form: {name}"))
            .multipart(multipart_body(&text, &html))?;

        self.mailer.send(mail).await?;
        tracing::info!(from = %email, "Contact message forwarded");
        Ok(())
    }

    /// Alert an admin that a new testimonial awaits moderation.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_testimonial_alert(
        &self,
        to: &str,
        author: &str,
        content: &str,
    ) -> Result<(), EmailError> {
        let html = TestimonialAlertHtml { author, content }.render()?;
        let text = TestimonialAlertText { author, content }.render()?;

        self.send_multipart_email(to, "New testimonial awaiting review", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.parse_address(&self.from_address)?)
            .to(self.parse_address(to)?)
            .subject(subject)
            .multipart(multipart_body(text_body, html_body))?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }

    fn parse_address(&self, raw: &str) -> Result<lettre::message::Mailbox, EmailError> {
        raw.parse()
            .map_err(|_| EmailError::InvalidAddress(raw.to_string()))
    }
}

fn multipart_body(text_body: &str, html_body: &str) -> MultiPart {
    MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(text_body.to_string()),
        )
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html_body.to_string()),
        )
}
