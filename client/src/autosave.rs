//! Debounced auto-save for task-title inputs.
//!
//! Edits collapse into one submission per quiet period. When the title has
//! been cleared (whitespace counts as empty) the form is pointed at the
//! delete endpoint for that task before submitting; otherwise the form's
//! save action is left untouched. Submission goes through the native,
//! non-intercepted mechanism, so it ends in a full navigation.

use std::time::Duration;

use crate::debounce::Debouncer;

/// Quiet period before an edit is acted upon.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// A title edit together with the task id read from the form's hidden `id`
/// field.
#[derive(Debug, Clone)]
pub struct TitleEdit {
    pub task_id: String,
    pub title: String,
}

/// Native form submission boundary. Implementations submit the owning form
/// to `action` without interception.
pub trait FormSubmitter: Send + Sync {
    fn submit(&self, action: &str);
}

/// The action the form should be submitted to for this edit.
pub fn resolve_action(edit: &TitleEdit, save_action: &str) -> String {
    if edit.title.trim().is_empty() {
        format!("/delete?id={}", edit.task_id)
    } else {
        save_action.to_string()
    }
}

pub struct AutosaveController {
    debouncer: Debouncer<TitleEdit>,
}

impl AutosaveController {
    pub fn new(
        delay: Duration,
        save_action: impl Into<String>,
        submitter: impl FormSubmitter + 'static,
    ) -> Self {
        let save_action = save_action.into();
        let debouncer = Debouncer::new(delay, move |edit: TitleEdit| {
            let action = resolve_action(&edit, &save_action);
            submitter.submit(&action);
        });

        Self { debouncer }
    }

    /// Records a keystroke. The save (or delete) fires once no further edit
    /// arrives for the configured delay.
    pub fn edited(&self, edit: TitleEdit) {
        self.debouncer.call(edit);
    }
}
