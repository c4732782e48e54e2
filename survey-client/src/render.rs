//! Per-question input widgets.
//!
//! `render` describes the widget for a question given its current draft
//! value; `apply` turns an input event on that widget back into an answer of
//! the shape the question kind expects. Both dispatch exhaustively over
//! `QuestionKind`, so a new kind cannot be forgotten here.

use crate::{AnswerValue, ChoiceQuestion, Question, QuestionId, QuestionKind};

/// Presentation-agnostic description of an input affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Multi-line text input.
    TextArea { value: String },

    /// Mutually exclusive options (single-select, yes/no).
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },

    /// Independently toggleable options (multi-select).
    Checklist { items: Vec<ChecklistItem> },

    /// Bounded integer slider.
    ///
    /// `value` is what the slider shows; `touched` is `false` when the draft
    /// holds no rating and the slider merely rests on `min`.
    Slider {
        min: i64,
        max: i64,
        step: i64,
        value: i64,
        touched: bool,
    },
}

/// One row of a checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub label: String,
    pub checked: bool,
}

/// A change made through a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Replace the text of a text area.
    Text(String),
    /// Pick an option of a choice widget.
    Choose(String),
    /// Check or uncheck an option of a checklist.
    Toggle(String),
    /// Move a slider.
    Slide(i64),
}

impl InputEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choose(_) => "Choose",
            Self::Toggle(_) => "Toggle",
            Self::Slide(_) => "Slide",
        }
    }
}

/// Error type for rejected input events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Question '{question}' does not accept {event} input")]
    Mismatch {
        question: QuestionId,
        event: &'static str,
    },

    #[error("Question '{question}' has no option '{option}'")]
    UnknownOption { question: QuestionId, option: String },

    #[error("Rating {value} for question '{question}' is outside {min}..={max}")]
    OutOfRange {
        question: QuestionId,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Describe the widget for `question` showing `value`.
pub fn render(question: &Question, value: Option<&AnswerValue>) -> Widget {
    match question.kind() {
        QuestionKind::FreeText => Widget::TextArea {
            value: value
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
                .to_string(),
        },
        QuestionKind::SingleSelect(_) | QuestionKind::YesNo => {
            let options: Vec<String> = question
                .kind()
                .choice_labels()
                .into_iter()
                .map(String::from)
                .collect();
            let selected = value
                .and_then(AnswerValue::as_text)
                .and_then(|label| options.iter().position(|o| o == label));
            Widget::Choice { options, selected }
        }
        QuestionKind::MultiSelect(choice) => {
            let chosen = value.and_then(AnswerValue::as_choices).unwrap_or_default();
            let items = choice
                .options()
                .iter()
                .map(|label| ChecklistItem {
                    label: label.clone(),
                    checked: chosen.contains(label),
                })
                .collect();
            Widget::Checklist { items }
        }
        QuestionKind::Rating(rating) => {
            let set = value.and_then(AnswerValue::as_rating);
            Widget::Slider {
                min: rating.min,
                max: rating.max,
                step: 1,
                value: set.unwrap_or(rating.min),
                touched: set.is_some(),
            }
        }
    }
}

/// Apply an input event to the current value of `question`.
///
/// Returns the new value to store in the draft.
pub fn apply(
    question: &Question,
    current: Option<&AnswerValue>,
    event: InputEvent,
) -> Result<AnswerValue, InputError> {
    let id = question.id();
    match (question.kind(), event) {
        (QuestionKind::FreeText, InputEvent::Text(text)) => Ok(AnswerValue::Text(text)),
        (QuestionKind::SingleSelect(_) | QuestionKind::YesNo, InputEvent::Choose(label)) => {
            if question.kind().choice_labels().contains(&label.as_str()) {
                Ok(AnswerValue::Text(label))
            } else {
                Err(InputError::UnknownOption {
                    question: id.clone(),
                    option: label,
                })
            }
        }
        (QuestionKind::MultiSelect(choice), InputEvent::Toggle(label)) => {
            let chosen = current.and_then(AnswerValue::as_choices).unwrap_or_default();
            toggle(choice, chosen, &label)
                .map(AnswerValue::Choices)
                .ok_or_else(|| InputError::UnknownOption {
                    question: id.clone(),
                    option: label,
                })
        }
        (QuestionKind::Rating(rating), InputEvent::Slide(value)) => {
            if rating.contains(value) {
                Ok(AnswerValue::Rating(value))
            } else {
                Err(InputError::OutOfRange {
                    question: id.clone(),
                    value,
                    min: rating.min,
                    max: rating.max,
                })
            }
        }
        (_, event) => Err(InputError::Mismatch {
            question: id.clone(),
            event: event.name(),
        }),
    }
}

/// Check or uncheck `label`.
///
/// Unchecking removes it and leaves the rest as they were. Checking inserts it
/// before the first chosen label that follows it in the option list, so
/// selections stay in option order and toggling twice is a no-op.
fn toggle(choice: &ChoiceQuestion, chosen: &[String], label: &str) -> Option<Vec<String>> {
    let rank = choice.position(label)?;
    if chosen.iter().any(|c| c == label) {
        return Some(chosen.iter().filter(|c| *c != label).cloned().collect());
    }
    let at = chosen
        .iter()
        .position(|c| choice.position(c).is_some_and(|other| other > rank))
        .unwrap_or(chosen.len());
    let mut next = chosen.to_vec();
    next.insert(at, label.to_string());
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NO, YES};

    fn colours() -> Question {
        Question::multi_select("q1", "Colours", ["red", "green", "blue"])
    }

    #[test]
    fn free_text_defaults_to_empty() {
        let question = Question::free_text("q1", "Thoughts?");
        assert_eq!(
            render(&question, None),
            Widget::TextArea {
                value: String::new()
            }
        );
    }

    #[test]
    fn yes_no_is_a_fixed_choice() {
        let question = Question::yes_no("q1", "Ok?");
        let value = AnswerValue::from(NO);

        assert_eq!(
            render(&question, Some(&value)),
            Widget::Choice {
                options: vec![YES.to_string(), NO.to_string()],
                selected: Some(1),
            }
        );
        assert_eq!(
            apply(&question, None, InputEvent::Choose(YES.to_string())),
            Ok(AnswerValue::from(YES))
        );
    }

    #[test]
    fn single_select_rejects_unknown_option() {
        let question = Question::single_select("q1", "Size", ["S", "M"]);
        assert!(matches!(
            apply(&question, None, InputEvent::Choose("XL".to_string())),
            Err(InputError::UnknownOption { .. })
        ));
    }

    #[test]
    fn checklist_reflects_selection() {
        let value = AnswerValue::from(vec!["blue"]);
        let Widget::Checklist { items } = render(&colours(), Some(&value)) else {
            panic!("expected a checklist");
        };
        let checked: Vec<bool> = items.iter().map(|i| i.checked).collect();
        assert_eq!(checked, vec![false, false, true]);
    }

    #[test]
    fn toggle_keeps_other_selections_in_place() {
        let question = colours();
        let current = AnswerValue::from(vec!["red", "blue"]);

        let added = apply(&question, Some(&current), InputEvent::Toggle("green".into())).unwrap();
        assert_eq!(added, AnswerValue::from(vec!["red", "green", "blue"]));

        let removed = apply(&question, Some(&added), InputEvent::Toggle("red".into())).unwrap();
        assert_eq!(removed, AnswerValue::from(vec!["green", "blue"]));
    }

    #[test]
    fn toggling_twice_restores_the_selection() {
        let question = colours();
        for start in [vec![], vec!["red"], vec!["red", "blue"], vec!["green", "blue"]] {
            let original = AnswerValue::from(start);
            for label in ["red", "green", "blue"] {
                let once =
                    apply(&question, Some(&original), InputEvent::Toggle(label.into())).unwrap();
                let twice =
                    apply(&question, Some(&once), InputEvent::Toggle(label.into())).unwrap();
                assert_eq!(twice, original, "toggling {label} twice");
            }
        }
    }

    #[test]
    fn untouched_slider_rests_on_minimum() {
        let question = Question::rating("q1", "Rate", 2, 7);
        assert_eq!(
            render(&question, None),
            Widget::Slider {
                min: 2,
                max: 7,
                step: 1,
                value: 2,
                touched: false,
            }
        );

        let value = AnswerValue::Rating(2);
        assert!(matches!(
            render(&question, Some(&value)),
            Widget::Slider { touched: true, .. }
        ));
    }

    #[test]
    fn slider_rejects_out_of_range() {
        let question = Question::rating("q1", "Rate", 1, 5);
        assert_eq!(
            apply(&question, None, InputEvent::Slide(6)),
            Err(InputError::OutOfRange {
                question: "q1".into(),
                value: 6,
                min: 1,
                max: 5,
            })
        );
        assert_eq!(
            apply(&question, None, InputEvent::Slide(5)),
            Ok(AnswerValue::Rating(5))
        );
    }

    #[test]
    fn event_must_fit_the_widget() {
        let question = Question::free_text("q1", "Thoughts?");
        assert!(matches!(
            apply(&question, None, InputEvent::Slide(3)),
            Err(InputError::Mismatch { event: "Slide", .. })
        ));
    }
}
