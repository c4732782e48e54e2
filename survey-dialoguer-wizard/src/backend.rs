//! Dialoguer front end for `SurveySession`.

use std::fmt;

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Editor, Input, MultiSelect, Select};
use survey_client::{
    ChecklistItem, FieldKey, InputEvent, QuestionId, RespondentField, SessionError, SessionState,
    SurveyGateway, SurveyResponseRecord, SurveySession, Widget,
};
use thiserror::Error;

/// Error type for the Dialoguer wizard.
#[derive(Debug, Error)]
pub enum WizardError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The session refused an action.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> WizardError {
    if is_cancelled(&err) {
        WizardError::Cancelled
    } else {
        WizardError::Dialoguer(err)
    }
}

/// What the user can do after answering a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Next,
    Previous,
    Submit,
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "Next"),
            Self::Previous => write!(f, "Previous"),
            Self::Submit => write!(f, "Submit"),
        }
    }
}

/// Actions offered at the session's current step.
pub fn step_actions(session: &SurveySession) -> Vec<StepAction> {
    let Some((index, _)) = session.position() else {
        return Vec::new();
    };
    let mut actions = Vec::with_capacity(2);
    if session.is_last_question() {
        actions.push(StepAction::Submit);
    } else {
        actions.push(StepAction::Next);
    }
    if index > 0 {
        actions.push(StepAction::Previous);
    }
    actions
}

/// Toggle events that turn the checked state of `items` into `selected`.
pub fn checklist_events(items: &[ChecklistItem], selected: &[usize]) -> Vec<InputEvent> {
    items
        .iter()
        .enumerate()
        .filter(|(index, item)| item.checked != selected.contains(index))
        .map(|(_, item)| InputEvent::Toggle(item.label.clone()))
        .collect()
}

/// Entry offered for leaving an optional choice unanswered.
pub const NO_ANSWER: &str = "(no answer)";

/// Entries and preselection of a single-choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub entries: Vec<String>,
    pub default: Option<usize>,
}

/// Lay out the prompt for a choice widget.
///
/// Only an existing selection is preselected. An optional question with
/// nothing chosen gets a trailing [`NO_ANSWER`] entry as its default; a
/// required one has no default, so the respondent has to pick.
pub fn choice_prompt(options: &[String], selected: Option<usize>, required: bool) -> ChoicePrompt {
    let mut entries = options.to_vec();
    let default = match selected {
        Some(index) => Some(index),
        None if required => None,
        None => {
            entries.push(NO_ANSWER.to_string());
            Some(options.len())
        }
    };
    ChoicePrompt { entries, default }
}

/// The event for the picked entry, or `None` when no option was picked.
pub fn choice_event(options: &[String], picked: usize) -> Option<InputEvent> {
    options
        .get(picked)
        .map(|label| InputEvent::Choose(label.clone()))
}

/// The event for text coming back from the editor. An aborted editor
/// (`None`) changes nothing.
fn editor_event(edited: Option<String>) -> Option<InputEvent> {
    edited.map(|text| InputEvent::Text(text.trim_end().to_string()))
}

/// Step-by-step survey wizard on the terminal.
///
/// Shows one question at a time, then the respondent fields on the last
/// step, and submits through the given gateway.
#[derive(Debug, Default, Clone)]
pub struct DialoguerWizard {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerWizard {
    /// Create a new wizard with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a wizard with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Walk the session to a stored response.
    ///
    /// Loads the survey first if needed. Cancelling abandons the session.
    pub async fn run<G>(
        &self,
        session: &mut SurveySession,
        gateway: &G,
    ) -> Result<SurveyResponseRecord, WizardError>
    where
        G: SurveyGateway + ?Sized,
    {
        if session.state() == SessionState::Loading {
            session.load(gateway).await?;
        }
        match self.drive(session, gateway).await {
            Err(WizardError::Cancelled) => {
                session.abandon();
                Err(WizardError::Cancelled)
            }
            result => result,
        }
    }

    async fn drive<G>(
        &self,
        session: &mut SurveySession,
        gateway: &G,
    ) -> Result<SurveyResponseRecord, WizardError>
    where
        G: SurveyGateway + ?Sized,
    {
        if let Some(survey) = session.survey() {
            println!("{}", survey.title());
            if let Some(description) = survey.description() {
                println!("{description}");
            }
            println!();
        }

        loop {
            self.ask_current(session)?;
            if session.is_last_question() {
                self.ask_respondent(session)?;
            }

            match self.choose_action(session)? {
                StepAction::Next => {
                    session.next();
                }
                StepAction::Previous => {
                    session.previous();
                }
                StepAction::Submit => match session.submit(gateway).await {
                    Ok(record) => return Ok(record),
                    Err(SessionError::Validation(errors)) => {
                        println!("Please fix the following before submitting:");
                        for key in session.schema().fields() {
                            if let Some(message) = errors.get(&key) {
                                println!("  {}: {message}", self.field_label(session, &key));
                            }
                        }
                        println!();
                    }
                    Err(SessionError::SubmissionFailure(err)) => {
                        println!("Error: {err}");
                        println!("Your answers are kept; submit again to retry.");
                        println!();
                    }
                    Err(err) => return Err(err.into()),
                },
            }
        }
    }

    fn field_label(&self, session: &SurveySession, key: &FieldKey) -> String {
        match key {
            FieldKey::Question(id) => session
                .survey()
                .and_then(|s| s.question(id))
                .map_or_else(|| id.to_string(), |q| q.prompt().to_string()),
            FieldKey::Respondent(RespondentField::Name) => "Name".to_string(),
            FieldKey::Respondent(RespondentField::Email) => "Email".to_string(),
            FieldKey::Respondent(RespondentField::Age) => "Age".to_string(),
        }
    }

    fn ask_current(&self, session: &mut SurveySession) -> Result<(), WizardError> {
        let Some(question) = session.current_question() else {
            return Ok(());
        };
        let id = question.id().clone();
        let required = question.is_required();
        let mut prompt = question.prompt().to_string();
        if required {
            prompt.push_str(" *");
        }
        if let Some((index, count)) = session.position() {
            println!("Question {} of {count}", index + 1);
        }
        let Some(widget) = session.current_widget() else {
            return Ok(());
        };

        match widget {
            Widget::TextArea { value } => self.ask_text(session, &id, &prompt, &value)?,
            Widget::Choice { options, selected } => {
                self.ask_choice(session, &id, &prompt, &options, selected, required)?
            }
            Widget::Checklist { items } => self.ask_checklist(session, &id, &prompt, &items)?,
            Widget::Slider {
                min,
                max,
                value,
                touched,
                ..
            } => self.ask_rating(session, &id, &prompt, min, max, touched.then_some(value))?,
        }

        if let Some(message) = session.field_error(&FieldKey::Question(id)) {
            println!("Error: {message}");
        }
        Ok(())
    }

    fn ask_text(
        &self,
        session: &mut SurveySession,
        id: &QuestionId,
        prompt: &str,
        value: &str,
    ) -> Result<(), WizardError> {
        println!("{prompt}");

        let edited = Editor::new().edit(value).map_err(prompt_error)?;
        if let Some(event) = editor_event(edited) {
            session.update_answer(id, event)?;
        }
        Ok(())
    }

    fn ask_choice(
        &self,
        session: &mut SurveySession,
        id: &QuestionId,
        prompt: &str,
        options: &[String],
        selected: Option<usize>,
        required: bool,
    ) -> Result<(), WizardError> {
        let layout = choice_prompt(options, selected, required);
        let theme = self.theme();
        let mut select = Select::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(&layout.entries);
        if let Some(default) = layout.default {
            select = select.default(default);
        }
        let picked = select.interact().map_err(prompt_error)?;

        if let Some(event) = choice_event(options, picked) {
            session.update_answer(id, event)?;
        }
        Ok(())
    }

    fn ask_checklist(
        &self,
        session: &mut SurveySession,
        id: &QuestionId,
        prompt: &str,
        items: &[ChecklistItem],
    ) -> Result<(), WizardError> {
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        let defaults: Vec<bool> = items.iter().map(|i| i.checked).collect();

        let theme = self.theme();
        let selected = MultiSelect::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(&labels)
            .defaults(&defaults)
            .interact()
            .map_err(prompt_error)?;

        for event in checklist_events(items, &selected) {
            session.update_answer(id, event)?;
        }
        Ok(())
    }

    fn ask_rating(
        &self,
        session: &mut SurveySession,
        id: &QuestionId,
        prompt: &str,
        min: i64,
        max: i64,
        current: Option<i64>,
    ) -> Result<(), WizardError> {
        let theme = self.theme();
        loop {
            let mut builder: Input<String> = Input::with_theme(theme.as_ref())
                .with_prompt(format!("{prompt} ({min}-{max})"))
                .allow_empty(true);
            if let Some(value) = current {
                builder = builder.default(value.to_string());
            }
            let raw = builder.interact_text().map_err(prompt_error)?;

            // Leaving it blank keeps the rating unset.
            if raw.trim().is_empty() {
                return Ok(());
            }
            let Ok(value) = raw.trim().parse::<i64>() else {
                println!("Error: Enter a whole number");
                continue;
            };
            match session.update_answer(id, InputEvent::Slide(value)) {
                Ok(()) => return Ok(()),
                Err(SessionError::Input(err)) => {
                    println!("Error: {err}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn ask_respondent(&self, session: &mut SurveySession) -> Result<(), WizardError> {
        println!();
        println!("About you");
        for (field, prompt) in [
            (RespondentField::Name, "Your name *"),
            (RespondentField::Email, "Email (optional)"),
            (RespondentField::Age, "Age (optional)"),
        ] {
            loop {
                let theme = self.theme();
                let current = session.respondent().get(field).to_string();
                let value: String = Input::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?;
                session.update_respondent(field, value)?;

                match session.field_error(&FieldKey::Respondent(field)) {
                    Some(message) => println!("Error: {message}"),
                    None => break,
                }
            }
        }
        Ok(())
    }

    fn choose_action(&self, session: &SurveySession) -> Result<StepAction, WizardError> {
        let actions = step_actions(session);
        let theme = self.theme();
        let choice = Select::with_theme(theme.as_ref())
            .items(&actions)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        println!();
        Ok(actions.get(choice).copied().unwrap_or(StepAction::Next))
    }
}
