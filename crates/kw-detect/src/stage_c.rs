//! Stage C: LLM adjudication with majority vote (spec §4.4).
//!
//! Every gap still `Uncertain` after Stage A/B — which, since Stage B never
//! finalizes a gap, is every gap Stage A didn't resolve with a confident
//! threshold — is dispatched to the configured `ProviderRouter` as `n_vote`
//! independent adjudication calls; concurrency across gaps and across votes
//! within a gap is bounded by the router's own semaphore (spec: "concurrent
//! dispatch bounded by router semaphore"). Results are collected with
//! `futures::future::join_all`, which preserves input order regardless of
//! completion order, so the output vector stays aligned with the document's
//! gap order without extra bookkeeping.
//!
//! Stage B's windowed z-score hint, carried on the `Uncertain` decision,
//! breaks ties when an even `n_vote` splits evenly, and is the first
//! fallback when every vote for a gap fails outright. Only when no hint
//! exists either (the gap's local window had zero spread) does the gap fall
//! back to the raw similarity's position relative to the midpoint of
//! `theta_low`/`theta_high`. Either fallback is logged as a warning — never
//! silent.

use kw_llm::ProviderRouter;

use crate::decision::GapDecision;

/// Prompt template for boundary adjudication. The model is asked for a
/// single `yes`/`no` token; [`parse_vote`] is lenient about surrounding
/// punctuation or explanation text.
fn build_prompt(before: &str, after: &str) -> String {
    format!(
        "You are segmenting a document into topic-coherent chunks.\n\
         Does a new topic begin at the sentence below, such that it should \
         be split from the sentence before it?\n\n\
         Previous sentence: {before}\n\
         Candidate next sentence: {after}\n\n\
         Answer with exactly one word: yes or no."
    )
}

fn parse_vote(response: &str) -> Option<bool> {
    let lower = response.to_ascii_lowercase();
    let starts_yes = lower.trim_start().starts_with("yes");
    let starts_no = lower.trim_start().starts_with("no");
    match (starts_yes, starts_no) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

/// Tally `n_vote` independent adjudication calls for one gap. A strict
/// majority decides; a tie (possible with an even `n_vote`) is broken by
/// Stage B's windowed hint rather than an arbitrary default. `None` means
/// no valid votes came back at all and no hint was available to break a
/// tie — the caller falls back further.
async fn adjudicate_gap(
    router: &ProviderRouter,
    before: &str,
    after: &str,
    n_vote: u32,
    likely_boundary_hint: Option<bool>,
) -> Option<bool> {
    let prompt = build_prompt(before, after);
    let votes = futures::future::join_all((0..n_vote).map(|_| router.generate(&prompt))).await;

    let mut yes = 0u32;
    let mut no = 0u32;
    for vote in votes {
        match vote {
            Ok(text) => match parse_vote(&text) {
                Some(true) => yes += 1,
                Some(false) => no += 1,
                None => {}
            },
            Err(error) => {
                tracing::debug!(error = %error, "adjudication call failed");
            }
        }
    }

    resolve_votes(yes, no, likely_boundary_hint)
}

/// Turn a yes/no tally plus Stage B's hint into a verdict. A strict
/// majority wins; a tie among at least one valid vote falls back to the
/// hint; no valid votes at all is undecided regardless of the hint (the
/// caller still applies the hint as its own fallback afterward).
fn resolve_votes(yes: u32, no: u32, likely_boundary_hint: Option<bool>) -> Option<bool> {
    match yes.cmp(&no) {
        std::cmp::Ordering::Greater => Some(true),
        std::cmp::Ordering::Less => Some(false),
        std::cmp::Ordering::Equal if yes + no > 0 => likely_boundary_hint,
        std::cmp::Ordering::Equal => None,
    }
}

/// Resolve every `Uncertain` gap via LLM majority vote. A gap Stage A/B
/// already resolved is returned unchanged without calling the router. When
/// every vote for a gap fails (or ties with no hint to break it), the gap
/// falls back to Stage B's windowed hint if one exists, else the raw
/// similarity's position relative to the `theta_low`/`theta_high` midpoint.
pub async fn adjudicate(
    router: &ProviderRouter,
    sentence_texts: &[String],
    similarities: &[f32],
    decisions: &[GapDecision],
    n_vote: u32,
    theta_low: f32,
    theta_high: f32,
) -> Vec<GapDecision> {
    let midpoint = (theta_low + theta_high) / 2.0;

    let futures = decisions.iter().enumerate().map(|(i, &decision)| {
        async move {
            let GapDecision::Uncertain { likely_boundary } = decision else {
                return decision;
            };
            let before = &sentence_texts[i];
            let after = &sentence_texts[i + 1];
            match adjudicate_gap(router, before, after, n_vote.max(1), likely_boundary).await {
                Some(true) => GapDecision::Boundary,
                Some(false) => GapDecision::NotBoundary,
                None => {
                    if let Some(hint) = likely_boundary {
                        tracing::warn!(
                            gap = i,
                            "adjudication undecided for this gap; falling back to Stage B's windowed hint"
                        );
                        if hint {
                            GapDecision::Boundary
                        } else {
                            GapDecision::NotBoundary
                        }
                    } else {
                        tracing::warn!(
                            gap = i,
                            "adjudication undecided and no windowed hint available; falling back to similarity midpoint"
                        );
                        if similarities[i] <= midpoint {
                            GapDecision::Boundary
                        } else {
                            GapDecision::NotBoundary
                        }
                    }
                }
            }
        }
    });

    futures::future::join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_vote_recognizes_yes() {
        assert_eq!(parse_vote("Yes, a new topic begins."), Some(true));
    }

    #[test]
    fn parse_vote_recognizes_no() {
        assert_eq!(parse_vote("no"), Some(false));
    }

    #[test]
    fn parse_vote_unrecognized_is_none() {
        assert_eq!(parse_vote("maybe"), None);
    }

    #[test]
    fn build_prompt_includes_both_sentences() {
        let prompt = build_prompt("First.", "Second.");
        assert!(prompt.contains("First."));
        assert!(prompt.contains("Second."));
    }

    #[test]
    fn resolve_votes_majority_wins_over_hint() {
        assert_eq!(resolve_votes(2, 1, Some(false)), Some(true));
    }

    #[test]
    fn resolve_votes_tie_falls_back_to_hint() {
        assert_eq!(resolve_votes(1, 1, Some(true)), Some(true));
        assert_eq!(resolve_votes(1, 1, Some(false)), Some(false));
    }

    #[test]
    fn resolve_votes_tie_with_no_hint_is_undecided() {
        assert_eq!(resolve_votes(1, 1, None), None);
    }

    #[test]
    fn resolve_votes_no_valid_votes_is_undecided_even_with_hint() {
        assert_eq!(resolve_votes(0, 0, Some(true)), None);
    }

    #[tokio::test]
    async fn resolved_decisions_pass_through_without_calling_router() {
        let router = ProviderRouter::new(
            &kw_llm::LlmConfig::default(),
            kw_llm::FailoverConfig::default(),
            None,
        );
        let decisions = vec![GapDecision::Boundary, GapDecision::NotBoundary];
        let sentence_texts = vec!["A.".to_string(), "B.".to_string(), "C.".to_string()];
        let similarities = vec![0.1, 0.9];
        let result = adjudicate(
            &router,
            &sentence_texts,
            &similarities,
            &decisions,
            3,
            0.55,
            0.85,
        )
        .await;
        assert_eq!(result, decisions);
    }
}
