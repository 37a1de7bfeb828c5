//! Knowledge-base documents.
//!
//! A knowledge base is written as JSON:
//!
//! ```json
//! {
//!   "name": "minerals",
//!   "questions": [
//!     { "id": "luster", "prompt": "What is the luster?",
//!       "answers": [ { "id": "Metallic", "label": "Metallic" },
//!                    { "id": "Dull", "label": "Dull" } ] }
//!   ],
//!   "rules": [
//!     { "id": "ask-luster", "when": { "fact": "Glitter" }, "question": "luster" },
//!     { "id": "silver", "out": "Silver", "target": true,
//!       "when": { "and": [ { "fact": "Glitter" }, { "fact": "Metallic" } ] } }
//!   ]
//! }
//! ```
//!
//! Answer ids are fact names. A rule without `when` always holds. Rules keep
//! their document order, which is the engine's evaluation order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sylloge_engine::{Expr, KnowledgeBase, Question, Rule};
use sylloge_foundation::{Error, ErrorContext, ErrorKind, Fact, Interner, Result};
use tracing::{debug, info, warn};

// =============================================================================
// Document Types
// =============================================================================

/// A knowledge base as written on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KbDocument {
    /// Knowledge base name.
    pub name: String,
    /// Questions, in declaration order.
    #[serde(default)]
    pub questions: Vec<QuestionDoc>,
    /// Rules, in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleDoc>,
}

/// A question entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionDoc {
    /// Question id, referenced by rules.
    pub id: String,
    /// Prompt shown to the user.
    pub prompt: String,
    /// Answer options, in display order.
    #[serde(default)]
    pub answers: Vec<AnswerDoc>,
}

/// An answer option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerDoc {
    /// The fact asserted by this answer.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// A rule entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDoc {
    /// Rule id.
    pub id: String,
    /// Activating expression; absent means always.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<ExprDoc>,
    /// Linked question id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Fixed output fact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// Whether the rule is a target rule.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub target: bool,
}

/// An expression as written on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprDoc {
    /// `{"fact": "A"}`
    Fact(String),
    /// `{"not": {...}}`
    Not(Box<ExprDoc>),
    /// `{"and": [...]}`
    And(Vec<ExprDoc>),
    /// `{"or": [...]}`
    Or(Vec<ExprDoc>),
}

impl ExprDoc {
    fn compile(&self, kb: &mut KnowledgeBase) -> Expr {
        match self {
            Self::Fact(name) => Expr::fact(kb.fact(name)),
            Self::Not(inner) => Expr::not(inner.compile(kb)),
            Self::And(children) => Expr::and(children.iter().map(|c| c.compile(kb))),
            Self::Or(children) => Expr::or(children.iter().map(|c| c.compile(kb))),
        }
    }

    fn from_expr(expr: &Expr, interner: &Interner) -> Self {
        match expr {
            Expr::Fact(fact) => Self::Fact(interner.display(*fact).to_string()),
            Expr::Not(inner) => Self::Not(Box::new(Self::from_expr(inner, interner))),
            Expr::And(children) => Self::And(Self::from_exprs(children, interner)),
            Expr::Or(children) => Self::Or(Self::from_exprs(children, interner)),
        }
    }

    fn from_exprs(children: &[Expr], interner: &Interner) -> Vec<Self> {
        children
            .iter()
            .map(|c| Self::from_expr(c, interner))
            .collect()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parses a JSON document.
///
/// # Errors
///
/// Returns a parse error with line and column if the text is not a valid
/// knowledge-base document.
pub fn parse_document(text: &str) -> Result<KbDocument> {
    serde_json::from_str(text).map_err(|e| {
        Error::parse(format!(
            "{} at line {}, column {}",
            e,
            e.line(),
            e.column()
        ))
    })
}

/// Reads and parses a JSON document from a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a parse error.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<KbDocument> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read '{}': {e}",
            path.display()
        )))
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read knowledge base document");
    parse_document(&text)
}

/// Builds a knowledge base from a document.
///
/// Questions are added before rules so rules may link any question in the
/// document. Rules with neither an output nor a question are accepted with a
/// warning; they abort the run that fires them.
///
/// # Errors
///
/// Returns an error on duplicate question or rule ids, or on a rule linking
/// an unknown question.
pub fn compile(doc: &KbDocument) -> Result<KnowledgeBase> {
    let mut kb = KnowledgeBase::new(&doc.name);

    for q in &doc.questions {
        let mut question = Question::new(&q.id, &q.prompt);
        for answer in &q.answers {
            let fact = kb.fact(&answer.id);
            question = question.with_answer(fact, &answer.label);
        }
        kb.add_question(question)?;
    }

    for r in &doc.rules {
        let expr = r.when.as_ref().map_or_else(Expr::always, |w| w.compile(&mut kb));
        let mut rule = Rule::new(&r.id, expr);
        if let Some(out) = &r.out {
            rule = rule.with_output(kb.fact(out));
        }
        if let Some(question) = &r.question {
            rule = rule.with_question(question);
        }
        if r.target {
            rule = rule.as_target();
        }
        kb.add_rule(rule)?;
    }

    for id in kb.structural_defects() {
        warn!(rule = id, "rule has neither an output nor a question");
    }
    info!(
        kb = kb.name(),
        rules = kb.rules().len(),
        questions = kb.questions().len(),
        facts = kb.interner().len(),
        "knowledge base compiled"
    );
    Ok(kb)
}

/// Reads, parses and compiles a knowledge base file.
///
/// # Errors
///
/// Returns any error from [`load_document`] or [`compile`], with the file
/// path as error context.
pub fn load_knowledge_base<P: AsRef<Path>>(path: P) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    load_document(path)
        .and_then(|doc| compile(&doc))
        .map_err(|e| e.with_context(ErrorContext::new().with_source(path.display().to_string())))
}

/// Converts a knowledge base back into its document form.
#[must_use]
pub fn decompile(kb: &KnowledgeBase) -> KbDocument {
    let interner = kb.interner();
    let name = |fact: Fact| interner.display(fact).to_string();

    KbDocument {
        name: kb.name().to_string(),
        questions: kb
            .questions()
            .iter()
            .map(|q| QuestionDoc {
                id: q.id.clone(),
                prompt: q.prompt.clone(),
                answers: q
                    .answers
                    .iter()
                    .map(|a| AnswerDoc {
                        id: name(a.fact),
                        label: a.label.clone(),
                    })
                    .collect(),
            })
            .collect(),
        rules: kb
            .rules()
            .iter()
            .map(|r| RuleDoc {
                id: r.id.clone(),
                when: (r.expr != Expr::always()).then(|| ExprDoc::from_expr(&r.expr, interner)),
                question: r.question.clone(),
                out: r.output.map(name),
                target: r.target,
            })
            .collect(),
    }
}

/// Renders a knowledge base as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if encoding fails.
pub fn to_json(kb: &KnowledgeBase) -> Result<String> {
    serde_json::to_string_pretty(&decompile(kb))
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

// =============================================================================
// Tests
// =============================================================================
