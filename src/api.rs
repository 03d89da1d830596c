//! Blocking client for the vocabulary/quiz JSON API.
//!
//! Only the write calls (create, update, delete) inspect the HTTP status. Every
//! other call decodes the body as-is, so a failing read shows up as a decode
//! error or as an `{error}` payload the caller already understands.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::model::{
    AnswerOutcome, Card, CreatedVocab, ErrorBody, FinishRound, McAnswer, McQuestion,
    McRoundStarted, NextItem, NextQuestion, RoundId, SortAnswer, SortOutcome,
    SortingKind, SortingNextPayload, SortingRoundStarted, VocabDraft, VocabEntry, VocabQuery,
};

/// Every remote operation the controller needs.
pub trait VocabApi {
    fn list_vocab(&self, query: &VocabQuery) -> ApiResult<Vec<VocabEntry>>;
    fn create_vocab(&self, draft: &VocabDraft) -> ApiResult<CreatedVocab>;
    fn update_vocab(&self, id: i64, draft: &VocabDraft) -> ApiResult<()>;
    fn delete_vocab(&self, id: i64) -> ApiResult<()>;

    fn start_quiz(&self) -> ApiResult<RoundId>;
    /// `None` when the server has no question left for this round.
    fn next_question(&self, round: &RoundId) -> ApiResult<Option<McQuestion>>;
    fn answer_question(&self, answer: &McAnswer) -> ApiResult<AnswerOutcome>;
    fn finish_quiz(&self, round: &RoundId) -> ApiResult<()>;

    fn list_cards(&self) -> ApiResult<Vec<Card>>;

    fn start_sorting(&self, kind: SortingKind) -> ApiResult<RoundId>;
    fn next_sorting(&self, kind: SortingKind, round: &RoundId) -> ApiResult<NextItem>;
    fn answer_sorting(&self, kind: SortingKind, answer: &SortAnswer) -> ApiResult<SortOutcome>;
}

pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    /// `timeout` of `None` waits for the server indefinitely.
    pub fn new(base: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.client.get(&url).query(query).send()?;
        decode(resp)
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let body = resp.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Turns a non-success response into `ApiError::Status`, keeping the server's
/// `error` text when the body carries one.
fn ensure_success(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).ok().map(|b| b.error);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl VocabApi for HttpApi {
    fn list_vocab(&self, query: &VocabQuery) -> ApiResult<Vec<VocabEntry>> {
        let mut params = Vec::new();
        if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        self.get("/vocab/", &params)
    }

    fn create_vocab(&self, draft: &VocabDraft) -> ApiResult<CreatedVocab> {
        info!(latin = %draft.latin_word, "creating vocab entry");
        let resp = self
            .client
            .post(self.url("/vocab/"))
            .json(draft)
            .send()?;
        decode(ensure_success(resp)?)
    }

    fn update_vocab(&self, id: i64, draft: &VocabDraft) -> ApiResult<()> {
        info!(id, "updating vocab entry");
        let resp = self
            .client
            .put(self.url(&format!("/vocab/{id}")))
            .json(draft)
            .send()?;
        ensure_success(resp)?;
        Ok(())
    }

    fn delete_vocab(&self, id: i64) -> ApiResult<()> {
        info!(id, "deleting vocab entry");
        let resp = self
            .client
            .delete(self.url(&format!("/vocab/{id}")))
            .send()?;
        ensure_success(resp)?;
        Ok(())
    }

    fn start_quiz(&self) -> ApiResult<RoundId> {
        let resp = self.client.post(self.url("/quiz/start")).send()?;
        let started: McRoundStarted = decode(resp)?;
        info!(round = %started.quiz_round_id, "multiple choice round started");
        Ok(started.quiz_round_id)
    }

    fn next_question(&self, round: &RoundId) -> ApiResult<Option<McQuestion>> {
        let next: NextQuestion = self.get("/quiz/next", &[("quizroundid", round.to_string())])?;
        Ok(next.into_first())
    }

    fn answer_question(&self, answer: &McAnswer) -> ApiResult<AnswerOutcome> {
        let resp = self
            .client
            .post(self.url("/quiz/answer"))
            .json(answer)
            .send()?;
        decode(resp)
    }

    fn finish_quiz(&self, round: &RoundId) -> ApiResult<()> {
        info!(%round, "finishing multiple choice round");
        self.client
            .post(self.url("/quiz/finish"))
            .json(&FinishRound {
                quiz_round_id: round.clone(),
            })
            .send()?;
        Ok(())
    }

    fn list_cards(&self) -> ApiResult<Vec<Card>> {
        self.get("/cards/", &[])
    }

    fn start_sorting(&self, kind: SortingKind) -> ApiResult<RoundId> {
        let resp = self
            .client
            .post(self.url(&format!("/quiz/{}/start", kind.path())))
            .send()?;
        let started: SortingRoundStarted = decode(resp)?;
        info!(round = %started.quizroundid, kind = kind.path(), "sorting round started");
        Ok(started.quizroundid)
    }

    fn next_sorting(&self, kind: SortingKind, round: &RoundId) -> ApiResult<NextItem> {
        let payload: SortingNextPayload = self.get(
            &format!("/quiz/{}/next", kind.path()),
            &[("quizroundid", round.to_string())],
        )?;
        payload
            .into_next(kind)
            .ok_or_else(|| ApiError::Malformed(format!("no {} in response", kind.path())))
    }

    fn answer_sorting(&self, kind: SortingKind, answer: &SortAnswer) -> ApiResult<SortOutcome> {
        let resp = self
            .client
            .post(self.url(&format!("/quiz/{}/answer", kind.path())))
            .json(answer)
            .send()?;
        decode(resp)
    }
}
