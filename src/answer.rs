//! Rule-table question answering.
//!
//! Resolves a free-text question against a fixed table of trigger
//! phrases. Matching is substring containment over the normalized
//! question; when several triggers match, the longest trigger wins, with
//! table order breaking ties. This is a total function: any input yields
//! a string, never an error.

use crate::transcription::Transcript;

/// Reserved question routed to the summarizer instead of this matcher.
pub const SUMMARY_TOKEN: &str = "resumo";

/// Fixed response when no trigger matches.
pub const NO_ANSWER: &str = "Não foi possível encontrar uma resposta para a pergunta.";

/// How many words of the transcript an "opening" answer quotes.
const OPENING_WORDS: usize = 50;

/// What a matched trigger produces.
enum Rule {
    /// Whitespace-split word count of the transcript.
    WordCount,
    /// The full transcript text.
    FullTranscript,
    /// The first [`OPENING_WORDS`] words of the transcript.
    Opening,
    /// A canned literal answer.
    Literal(&'static str),
}

/// Trigger table. Order only matters for breaking length ties.
const RULES: &[(&str, Rule)] = &[
    ("quantas palavras", Rule::WordCount),
    ("transcrição completa", Rule::FullTranscript),
    ("transcricao completa", Rule::FullTranscript),
    ("como começa", Rule::Opening),
    ("primeiras palavras", Rule::Opening),
    ("qual o idioma", Rule::Literal("O vídeo foi transcrito em português do Brasil.")),
];

/// Normalize a question for matching: lowercase and trim.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// True when the question is the reserved summary token.
pub fn is_summary_request(question: &str) -> bool {
    normalize(question) == SUMMARY_TOKEN
}

/// Answer a question from the transcript.
pub fn answer(transcript: &Transcript, question: &str) -> String {
    let normalized = normalize(question);

    // Longest trigger wins; iteration order breaks ties.
    let matched = RULES
        .iter()
        .filter(|(trigger, _)| normalized.contains(trigger))
        .max_by_key(|(trigger, _)| trigger.len());

    match matched {
        Some((_, Rule::WordCount)) => {
            format!("A transcrição contém {} palavras.", transcript.word_count())
        }
        Some((_, Rule::FullTranscript)) => transcript.text(),
        Some((_, Rule::Opening)) => {
            let text = transcript.text();
            let opening: Vec<&str> = text.split_whitespace().take(OPENING_WORDS).collect();
            if opening.is_empty() {
                NO_ANSWER.to_string()
            } else {
                opening.join(" ")
            }
        }
        Some((_, Rule::Literal(text))) => (*text).to_string(),
        None => NO_ANSWER.to_string(),
    }
}
