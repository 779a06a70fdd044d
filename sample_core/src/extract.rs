use std::fmt;

use select::{
    document::Document,
    node::Node,
    predicate::{Attr, Name, Predicate},
};

use crate::{
    error::{Error, Result},
    memory::parse_memory,
    problem::{Problem, Sample},
};

/// Element ids the problem page is queried by.
pub struct Selectors;

impl Selectors {
    pub const TITLE: &'static str = "problem_title";
    /// `#problem-info > tbody > tr > td:nth-child(n)`; time limit is column 0, memory column 1.
    pub const INFO_TABLE: &'static str = "problem-info";
    pub const TIME_LIMIT_COLUMN: usize = 0;
    pub const MEMORY_LIMIT_COLUMN: usize = 1;

    pub fn sample_input(index: usize) -> String {
        format!("sample-input-{}", index)
    }

    pub fn sample_output(index: usize) -> String {
        format!("sample-output-{}", index)
    }
}

/// Whatever was recovered from a document, kept for diagnosis when extraction fails.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartialProblem {
    pub title: Option<String>,
    pub time_limit: Option<f64>,
    pub memory_limit: Option<f64>,
    pub samples: Vec<Sample>,
}

impl fmt::Display for PartialProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TL: {:?}", self.time_limit)?;
        writeln!(f, "ML: {:?}", self.memory_limit)?;
        writeln!(f, "Title: {:?}", self.title)?;
        write!(f, "Samples: {:?}", self.samples)
    }
}

/// Build a problem from its statement page.
pub fn extract(id: u32, document: &str) -> Result<Problem> {
    let document = Document::from(document);

    let title = document
        .find(Attr("id", Selectors::TITLE))
        .next()
        .map(|node| node.text())
        .filter(|title| !title.is_empty());

    let time_limit = info_cell(&document, Selectors::TIME_LIMIT_COLUMN)
        .and_then(|text| parse_time_limit(&text))
        .filter(|tl| *tl > 0.0);

    // a cell that is present but unreadable is a format error, not a missing field
    let memory_limit = info_cell(&document, Selectors::MEMORY_LIMIT_COLUMN)
        .map(|text| {
            let joined: String = text.split_whitespace().take(2).collect();
            parse_memory(&joined)
        })
        .transpose()?
        .filter(|ml| *ml > 0.0);

    let samples = find_samples(&document);

    match (title, time_limit, memory_limit) {
        (Some(title), Some(time_limit), Some(memory_limit)) if !samples.is_empty() => {
            Ok(Problem {
                title,
                id,
                time_limit,
                memory_limit,
                samples,
            })
        }
        (title, time_limit, memory_limit) => Err(Error::Validation(PartialProblem {
            title,
            time_limit,
            memory_limit,
            samples,
        })),
    }
}

fn info_cell(document: &Document, column: usize) -> Option<String> {
    let row = document
        .find(
            Attr("id", Selectors::INFO_TABLE)
                .child(Name("tbody"))
                .child(Name("tr")),
        )
        .next()?;

    row.children()
        .filter(|node| node.name() == Some("td"))
        .nth(column)
        .map(|node| node.text())
}

/// Leading numeric token, e.g. `2 초 (추가 시간 없음)` is two seconds.
fn parse_time_limit(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

fn find_samples(document: &Document) -> Vec<Sample> {
    let mut samples = Vec::new();

    for index in 1.. {
        let input = find_by_id(document, &Selectors::sample_input(index));
        let output = find_by_id(document, &Selectors::sample_output(index));

        match (input, output) {
            (Some(input), Some(output)) => samples.push(Sample {
                input: input.text().trim_end().to_string(),
                output: output.text().trim_end().to_string(),
            }),
            _ => break,
        }
    }

    samples
}

fn find_by_id<'a>(document: &'a Document, id: &str) -> Option<Node<'a>> {
    document.find(Attr("id", id)).next()
}
