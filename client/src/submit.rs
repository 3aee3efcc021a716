//! Shared submission flow for the login and register forms.
//!
//! Both forms follow the same shape: clear the error slots, post the form
//! fields, then reconcile the server's JSON reply into exactly one outcome.
//! A 2xx reply navigates; a non-2xx reply with a recognized `field` writes
//! `message` into that field's error slot; anything else (unknown field,
//! transport failure, unparseable body) falls back to a blocking alert.

use serde::Deserialize;
use tracing::error;

use crate::transport::{Transport, TransportReply};

/// Shown when the request never completed or the reply made no sense.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Shown locally when the two password inputs differ, before any request.
pub const MISMATCH_MESSAGE: &str = "Passwords do not match";

/// An input the server can attribute a validation failure to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "username" => Some(Self::Username),
            "password" => Some(Self::Password),
            "confirmPassword" => Some(Self::ConfirmPassword),
            _ => None,
        }
    }
}

/// Reply contract shared with the server: `redirect` on success, `field` +
/// `message` on failure. No versioning; every member is optional so an
/// unexpected shape degrades to the alert path instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Exactly one of these happens per submission attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Navigate(String),
    FieldError(Field, String),
    Alert(String),
}

enum SuccessNav {
    /// Navigate to the reply's `redirect` member.
    FromReply,
    /// Navigate to a fixed destination, ignoring the reply body.
    Fixed(&'static str),
}

/// One form's submission parameters: where to post, which reply fields map
/// to an error slot, and where success navigates.
pub struct SubmitSpec {
    endpoint: &'static str,
    slots: &'static [Field],
    on_success: SuccessNav,
}

pub const LOGIN: SubmitSpec = SubmitSpec {
    endpoint: "/login",
    slots: &[Field::Username, Field::Password],
    on_success: SuccessNav::FromReply,
};

pub const REGISTER: SubmitSpec = SubmitSpec {
    endpoint: "/register",
    slots: &[Field::Username, Field::Password, Field::ConfirmPassword],
    on_success: SuccessNav::Fixed("/login"),
};

/// Maps a completed request to its single outcome.
pub fn reconcile(spec: &SubmitSpec, reply: TransportReply) -> Outcome {
    if reply.success {
        let target = match spec.on_success {
            SuccessNav::Fixed(url) => Some(url.to_string()),
            SuccessNav::FromReply => reply.body.redirect,
        };
        return match target {
            Some(url) => Outcome::Navigate(url),
            None => Outcome::Alert(GENERIC_FAILURE.to_string()),
        };
    }

    let message = reply
        .body
        .message
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    match reply.body.field.as_deref().and_then(Field::from_name) {
        Some(field) if spec.slots.contains(&field) => Outcome::FieldError(field, message),
        _ => Outcome::Alert(message),
    }
}

/// Posts the form and reconciles the reply. Transport failures are logged
/// and surface as a generic alert rather than propagating.
pub async fn submit<T: Transport>(
    transport: &T,
    spec: &SubmitSpec,
    fields: &[(String, String)],
) -> Outcome {
    match transport.post_form(spec.endpoint, fields).await {
        Ok(reply) => reconcile(spec, reply),
        Err(err) => {
            error!("submitting to {} failed: {err}", spec.endpoint);
            Outcome::Alert(GENERIC_FAILURE.to_string())
        }
    }
}

/// The page boundary: error slots, alert dialog, and navigation.
pub trait FormPage {
    fn clear_errors(&mut self);
    fn show_field_error(&mut self, field: Field, message: &str);
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, url: &str);
}

fn apply<P: FormPage>(page: &mut P, outcome: Outcome) {
    match outcome {
        Outcome::Navigate(url) => page.navigate(&url),
        Outcome::FieldError(field, message) => page.show_field_error(field, &message),
        Outcome::Alert(message) => page.alert(&message),
    }
}

fn field_value<'a>(fields: &'a [(String, String)], name: &str) -> &'a str {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

/// Login flow: clear errors, post, reconcile. Error-clearing always precedes
/// request issuance.
pub async fn submit_login<T: Transport, P: FormPage>(
    transport: &T,
    page: &mut P,
    fields: &[(String, String)],
) {
    page.clear_errors();
    let outcome = submit(transport, &LOGIN, fields).await;
    apply(page, outcome);
}

/// Register flow: like login, but a password/confirm-password mismatch is
/// reported locally and no request is made.
pub async fn submit_register<T: Transport, P: FormPage>(
    transport: &T,
    page: &mut P,
    fields: &[(String, String)],
) {
    page.clear_errors();

    if field_value(fields, "password") != field_value(fields, "confirmPassword") {
        page.show_field_error(Field::ConfirmPassword, MISMATCH_MESSAGE);
        return;
    }

    let outcome = submit(transport, &REGISTER, fields).await;
    apply(page, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockTransport {
        reply: Mutex<Option<Result<TransportReply, TransportError>>>,
        calls: AtomicUsize,
    }

    impl MockTransport {
        fn replying(reply: Result<TransportReply, TransportError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
            }
        }

        fn unreachable_server() -> Self {
            Self::replying(Err(TransportError::new("connection refused")))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for MockTransport {
        async fn post_form(
            &self,
            _endpoint: &str,
            _fields: &[(String, String)],
        ) -> Result<TransportReply, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("unexpected network request")
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Cleared,
        FieldError(Field, String),
        Alert(String),
        Navigate(String),
    }

    #[derive(Default)]
    struct RecordingPage {
        events: Vec<Event>,
    }

    impl FormPage for RecordingPage {
        fn clear_errors(&mut self) {
            self.events.push(Event::Cleared);
        }

        fn show_field_error(&mut self, field: Field, message: &str) {
            self.events.push(Event::FieldError(field, message.to_string()));
        }

        fn alert(&mut self, message: &str) {
            self.events.push(Event::Alert(message.to_string()));
        }

        fn navigate(&mut self, url: &str) {
            self.events.push(Event::Navigate(url.to_string()));
        }
    }

    fn ok_reply(body: ServerReply) -> Result<TransportReply, TransportError> {
        Ok(TransportReply {
            success: true,
            body,
        })
    }

    fn failed_reply(field: &str, message: &str) -> Result<TransportReply, TransportError> {
        Ok(TransportReply {
            success: false,
            body: ServerReply {
                redirect: None,
                field: Some(field.to_string()),
                message: Some(message.to_string()),
            },
        })
    }

    fn credentials(username: &str, password: &str) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]
    }

    fn registration(password: &str, confirm: &str) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), "alice".to_string()),
            ("password".to_string(), password.to_string()),
            ("confirmPassword".to_string(), confirm.to_string()),
        ]
    }

    #[tokio::test]
    async fn login_success_navigates_to_the_reply_redirect() {
        let transport = MockTransport::replying(ok_reply(ServerReply {
            redirect: Some("/tasks".to_string()),
            field: None,
            message: None,
        }));
        let mut page = RecordingPage::default();

        submit_login(&transport, &mut page, &credentials("alice", "hunter2!A")).await;

        assert_eq!(
            page.events,
            vec![Event::Cleared, Event::Navigate("/tasks".to_string())]
        );
    }

    #[tokio::test]
    async fn login_field_error_lands_in_the_matching_slot() {
        let transport =
            MockTransport::replying(failed_reply("password", "Incorrect password"));
        let mut page = RecordingPage::default();

        submit_login(&transport, &mut page, &credentials("alice", "wrong")).await;

        assert_eq!(
            page.events,
            vec![
                Event::Cleared,
                Event::FieldError(Field::Password, "Incorrect password".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn login_unattributed_error_alerts() {
        let transport = MockTransport::replying(failed_reply("", "Server on fire"));
        let mut page = RecordingPage::default();

        submit_login(&transport, &mut page, &credentials("alice", "hunter2!A")).await;

        assert_eq!(
            page.events,
            vec![Event::Cleared, Event::Alert("Server on fire".to_string())]
        );
    }

    #[tokio::test]
    async fn login_transport_failure_alerts_exactly_once() {
        let transport = MockTransport::unreachable_server();
        let mut page = RecordingPage::default();

        submit_login(&transport, &mut page, &credentials("alice", "hunter2!A")).await;

        assert_eq!(
            page.events,
            vec![Event::Cleared, Event::Alert(GENERIC_FAILURE.to_string())]
        );
    }

    #[tokio::test]
    async fn register_mismatch_is_local_and_makes_no_request() {
        let transport = MockTransport::unreachable_server();
        let mut page = RecordingPage::default();

        submit_register(&transport, &mut page, &registration("a", "b")).await;

        assert_eq!(transport.calls(), 0);
        assert_eq!(
            page.events,
            vec![
                Event::Cleared,
                Event::FieldError(Field::ConfirmPassword, MISMATCH_MESSAGE.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn register_success_navigates_to_login() {
        let transport = MockTransport::replying(ok_reply(ServerReply::default()));
        let mut page = RecordingPage::default();

        submit_register(&transport, &mut page, &registration("S3cret!pw", "S3cret!pw")).await;

        assert_eq!(transport.calls(), 1);
        assert_eq!(
            page.events,
            vec![Event::Cleared, Event::Navigate("/login".to_string())]
        );
    }

    #[tokio::test]
    async fn register_confirm_password_error_lands_in_its_slot() {
        let transport = MockTransport::replying(failed_reply(
            "confirmPassword",
            "Passwords do not match",
        ));
        let mut page = RecordingPage::default();

        submit_register(&transport, &mut page, &registration("S3cret!pw", "S3cret!pw")).await;

        assert_eq!(
            page.events,
            vec![
                Event::Cleared,
                Event::FieldError(
                    Field::ConfirmPassword,
                    "Passwords do not match".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn register_transport_failure_alerts_like_login() {
        let transport = MockTransport::unreachable_server();
        let mut page = RecordingPage::default();

        submit_register(&transport, &mut page, &registration("S3cret!pw", "S3cret!pw")).await;

        assert_eq!(
            page.events,
            vec![Event::Cleared, Event::Alert(GENERIC_FAILURE.to_string())]
        );
    }

    #[test]
    fn success_without_a_redirect_degrades_to_an_alert() {
        let outcome = reconcile(
            &LOGIN,
            TransportReply {
                success: true,
                body: ServerReply::default(),
            },
        );

        assert_eq!(outcome, Outcome::Alert(GENERIC_FAILURE.to_string()));
    }

    #[test]
    fn failure_naming_an_unknown_field_alerts() {
        let outcome = reconcile(
            &LOGIN,
            TransportReply {
                success: false,
                body: ServerReply {
                    redirect: None,
                    field: Some("captcha".to_string()),
                    message: Some("nope".to_string()),
                },
            },
        );

        assert_eq!(outcome, Outcome::Alert("nope".to_string()));
    }

    #[test]
    fn login_does_not_recognize_the_confirm_password_slot() {
        let outcome = reconcile(
            &LOGIN,
            TransportReply {
                success: false,
                body: ServerReply {
                    redirect: None,
                    field: Some("confirmPassword".to_string()),
                    message: Some("nope".to_string()),
                },
            },
        );

        assert_eq!(outcome, Outcome::Alert("nope".to_string()));
    }
}
