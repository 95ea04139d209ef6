//! Interactive atoms: quizzes, reflections and task lists.
//!
//! Offline pages cannot grade anything server-side, so every quiz renders its
//! question with working inputs and keeps the solution in a collapsed
//! `<details>` block. `main.js` adds a "Check" button behaviour for choice
//! quizzes using the `data-correct` attributes.
//!
//! Choice, matching and validated quizzes never touch the lesson directory;
//! a choice quiz's feedback video plays from its remote URL. Task lists,
//! reflections and code quizzes fetch their videos like video atoms do.

use super::video::{VideoPayload, remote_player, video_player, video_stem};
use super::{AtomContext, AtomError, payload};
use crate::templates::markdown;
use crate::types::Atom;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceInput {
    Checkbox,
    Radio,
}

impl ChoiceInput {
    fn input_type(self) -> &'static str {
        match self {
            ChoiceInput::Checkbox => "checkbox",
            ChoiceInput::Radio => "radio",
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct TaskListPayload {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tasks: Vec<String>,
    #[serde(default)]
    positive_feedback: Option<String>,
    #[serde(default)]
    video_feedback: Option<VideoPayload>,
}

#[derive(Debug, Deserialize)]
struct ChoiceQuizPayload {
    question: ChoiceQuestion,
    #[serde(default)]
    correct_feedback: Option<String>,
    #[serde(default)]
    video_feedback: Option<VideoPayload>,
}

#[derive(Debug, Deserialize)]
struct ChoiceQuestion {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    answers: Vec<ChoiceAnswer>,
}

#[derive(Debug, Deserialize)]
struct ChoiceAnswer {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    text: String,
    #[serde(default)]
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct MatchingQuizPayload {
    question: MatchingQuestion,
}

#[derive(Debug, Deserialize)]
struct MatchingQuestion {
    #[serde(default)]
    complex_prompt: Option<TextBlock>,
    #[serde(default)]
    concepts_label: Option<String>,
    #[serde(default)]
    answers_label: Option<String>,
    #[serde(default)]
    concepts: Vec<MatchingConcept>,
    #[serde(default)]
    answers: Vec<TextBlock>,
}

#[derive(Debug, Deserialize)]
struct MatchingConcept {
    #[serde(default)]
    text: String,
    #[serde(default)]
    correct_answer: Option<TextBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ReflectPayload {
    question: ReflectQuestion,
    #[serde(default)]
    answer: Option<ReflectAnswer>,
}

#[derive(Debug, Deserialize)]
struct ReflectQuestion {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ReflectAnswer {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    video: Option<VideoPayload>,
}

#[derive(Debug, Deserialize)]
struct CodeQuizPayload {
    #[serde(default)]
    instruction: Option<Instruction>,
    #[serde(default)]
    question: Option<CodeQuestion>,
}

#[derive(Debug, Deserialize)]
struct Instruction {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    video: Option<VideoPayload>,
}

#[derive(Debug, Deserialize)]
struct CodeQuestion {
    #[serde(default)]
    initial_code_files: Vec<CodeFile>,
}

#[derive(Debug, Deserialize)]
struct CodeFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ValidatedQuizPayload {
    question: ValidatedQuestion,
    #[serde(default)]
    correct_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidatedQuestion {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    matchers: Vec<Matcher>,
}

#[derive(Debug, Deserialize)]
struct Matcher {
    #[serde(default)]
    expression: String,
}

// ============================================================================
// Renderers
// ============================================================================

pub fn render_task_list(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let tasks: TaskListPayload = payload(atom)?;
    let feedback_video = optional_video(tasks.video_feedback.as_ref(), atom, "feedback", ctx)?;
    let group = input_group(ctx);

    Ok(html! {
        div.task-list {
            @if let Some(description) = &tasks.description {
                div.description { (markdown(description)) }
            }
            ul.tasks {
                @for (i, task) in tasks.tasks.iter().enumerate() {
                    @let id = format!("{group}-{i}");
                    li {
                        input type="checkbox" id=(id);
                        label for=(id) { (markdown(task)) }
                    }
                }
            }
            @if tasks.positive_feedback.is_some() || feedback_video.is_some() {
                details.feedback {
                    summary { "Feedback" }
                    @if let Some(feedback) = &tasks.positive_feedback {
                        (markdown(feedback))
                    }
                    @if let Some(video) = feedback_video {
                        (video)
                    }
                }
            }
        }
    })
}

pub fn render_choice_quiz(
    atom: &Atom,
    ctx: &AtomContext<'_>,
    input: ChoiceInput,
) -> Result<Markup, AtomError> {
    let quiz: ChoiceQuizPayload = payload(atom)?;
    let feedback_video = quiz
        .video_feedback
        .as_ref()
        .and_then(|video| remote_player(video, &ctx.media.video_quality));
    let group = input_group(ctx);

    Ok(html! {
        form.quiz.choice-quiz data-input=(input.input_type()) {
            div.prompt { (markdown(&quiz.question.prompt)) }
            ul.answers {
                @for (i, answer) in quiz.question.answers.iter().enumerate() {
                    @let id = format!("{group}-{i}");
                    li {
                        input type=(input.input_type()) name=(group) id=(id)
                            value=(answer_id(&answer.id, i)) data-correct=(if answer.is_correct { "true" } else { "false" });
                        label for=(id) { (markdown(&answer.text)) }
                    }
                }
            }
            button.check-answer type="button" { "Check" }
            p.quiz-result {}
            details.solution {
                summary { "Show solution" }
                ul.correct-answers {
                    @for answer in quiz.question.answers.iter().filter(|a| a.is_correct) {
                        li { (markdown(&answer.text)) }
                    }
                }
                @if let Some(feedback) = &quiz.correct_feedback {
                    div.feedback { (markdown(feedback)) }
                }
                @if let Some(video) = feedback_video {
                    (video)
                }
            }
        }
    })
}

pub fn render_matching_quiz(atom: &Atom) -> Result<Markup, AtomError> {
    let quiz: MatchingQuizPayload = payload(atom)?;
    let question = &quiz.question;
    let concepts_label = question.concepts_label.as_deref().unwrap_or("Concept");
    let answers_label = question.answers_label.as_deref().unwrap_or("Answer");

    Ok(html! {
        div.quiz.matching-quiz {
            @if let Some(prompt) = &question.complex_prompt {
                div.prompt { (markdown(&prompt.text)) }
            }
            table.matching {
                thead {
                    tr { th { (concepts_label) } th { (answers_label) } }
                }
                tbody {
                    @for concept in &question.concepts {
                        tr {
                            td { (markdown(&concept.text)) }
                            td {
                                select {
                                    option value="" { "-" }
                                    @for answer in &question.answers {
                                        option { (answer.text) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            details.solution {
                summary { "Show solution" }
                table.matching {
                    @for concept in &question.concepts {
                        tr {
                            td { (markdown(&concept.text)) }
                            td {
                                @if let Some(correct) = &concept.correct_answer {
                                    (markdown(&correct.text))
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn render_reflect(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let reflect: ReflectPayload = payload(atom)?;
    let answer_video = optional_video(
        reflect.answer.as_ref().and_then(|a| a.video.as_ref()),
        atom,
        "answer",
        ctx,
    )?;
    let answer_text = reflect.answer.as_ref().and_then(|a| a.text.as_deref());

    Ok(html! {
        div.quiz.reflect {
            @if let Some(title) = &reflect.question.title {
                div.question-title { (markdown(title)) }
            }
            div.prompt { (markdown(&reflect.question.text)) }
            textarea rows="6" placeholder="Your reflection" {}
            @if answer_text.is_some() || answer_video.is_some() {
                details.solution {
                    summary { "Our answer" }
                    @if let Some(text) = answer_text {
                        (markdown(text))
                    }
                    @if let Some(video) = answer_video {
                        (video)
                    }
                }
            }
        }
    })
}

pub fn render_code_quiz(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let quiz: CodeQuizPayload = payload(atom)?;
    let instruction_video = optional_video(
        quiz.instruction.as_ref().and_then(|i| i.video.as_ref()),
        atom,
        "instruction",
        ctx,
    )?;
    let instruction_text = quiz.instruction.as_ref().and_then(|i| i.text.as_deref());
    let files = quiz
        .question
        .as_ref()
        .map(|q| q.initial_code_files.as_slice())
        .unwrap_or_default();

    Ok(html! {
        div.quiz.code-quiz {
            @if let Some(text) = instruction_text {
                div.instruction { (markdown(text)) }
            }
            @if let Some(video) = instruction_video {
                (video)
            }
            @for file in files {
                div.code-file {
                    p.code-file-name { (file.name) }
                    pre { code { (file.text) } }
                }
            }
        }
    })
}

pub fn render_validated_quiz(atom: &Atom) -> Result<Markup, AtomError> {
    let quiz: ValidatedQuizPayload = payload(atom)?;

    Ok(html! {
        div.quiz.validated-quiz {
            div.prompt { (markdown(&quiz.question.prompt)) }
            input type="text" placeholder="Your answer";
            details.solution {
                summary { "Accepted answers" }
                ul {
                    @for matcher in &quiz.question.matchers {
                        li { code { (matcher.expression) } }
                    }
                }
                @if let Some(feedback) = &quiz.correct_feedback {
                    div.feedback { (markdown(feedback)) }
                }
            }
        }
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn optional_video(
    video: Option<&VideoPayload>,
    atom: &Atom,
    suffix: &str,
    ctx: &AtomContext<'_>,
) -> Result<Option<Markup>, AtomError> {
    video
        .map(|video| video_player(video, &video_stem(ctx, atom.title_or_empty(), Some(suffix)), ctx))
        .transpose()
}

/// Form control name unique within a page.
fn input_group(ctx: &AtomContext<'_>) -> String {
    format!("atom-{}-{}", ctx.prefix, ctx.index)
}

fn answer_id(id: &Value, index: usize) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => index.to_string(),
    }
}
