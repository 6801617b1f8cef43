//! Response router: turns one raw question into exactly one [`Response`].
//!
//! Per call the router picks one of four routes and runs it to completion:
//!
//! - **small talk**: no knowledge-base match and the input is a greeting / courtesy phrase;
//! - **matched**: a knowledge-base entry scored above the threshold;
//! - **augmented**: no match, but an augmentation capability is configured;
//! - **unanswerable**: no match and no augmentation, so the conversation is handed off.
//!
//! Capability failures never escape [`ResponseRouter::answer`]; they select a fallback shape.

mod capability;
mod small_talk;

pub use capability::{
    is_affirmative, Generator, LogTransferNotifier, TransferJudge, TransferNotifier,
    TransferVerdict,
};
pub use small_talk::{is_small_talk, small_talk_reply, GREETING_REPLY, THANKS_REPLY};

use crate::error::CapabilityFailure;
use crate::knowledge::{Entry, KnowledgeIndex, DEFAULT_THRESHOLD};
use crate::shared::{Response, ResponseSource};
use std::sync::Arc;

/// Context handed to the generator when the knowledge base has nothing relevant.
pub const NO_CONTEXT_MARKER: &str =
    "No hay información relevante en la base de conocimientos para esta pregunta.";
/// Search-result tag handed to the transfer judge when nothing matched.
pub const NO_RESULTS_MARKER: &str = "sin_resultados";
pub const REASON_GENERATION_FAILED: &str = "Error al generar respuesta con LLM";
pub const REASON_NO_RELEVANT_INFO: &str =
    "No se encontró información relevante en la base de conocimientos";
pub const APOLOGY_HANDOFF_MESSAGE: &str = "Lo siento, no tengo información específica sobre esa pregunta en mi base de datos. Voy a transferir su consulta a uno de nuestros agentes especializados que podrá ayudarle mejor.";

enum Route<'a> {
    SmallTalk,
    Matched(&'a Entry),
    Augmented(&'a dyn Generator),
    Unanswerable,
}

/// Decision engine over a shared, read-only [`KnowledgeIndex`].
///
/// Capabilities are optional collaborators: `None` means fallback mode, checked explicitly.
pub struct ResponseRouter {
    index: Arc<KnowledgeIndex>,
    generator: Option<Arc<dyn Generator>>,
    judge: Option<Arc<dyn TransferJudge>>,
    notifier: Arc<dyn TransferNotifier>,
    threshold: f64,
}

impl ResponseRouter {
    /// Router in fallback mode (no capabilities) that logs transfers.
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self {
            index,
            generator: None,
            judge: None,
            notifier: Arc::new(LogTransferNotifier),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_generator(mut self, generator: Option<Arc<dyn Generator>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_transfer_judge(mut self, judge: Option<Arc<dyn TransferJudge>>) -> Self {
        self.judge = judge;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn TransferNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// True when no augmentation capability is configured.
    pub fn is_fallback_mode(&self) -> bool {
        self.generator.is_none()
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    pub fn all_entries(&self) -> Vec<&Entry> {
        self.index.get_all()
    }

    pub fn entries_by_category(&self, category: &str) -> Vec<&Entry> {
        self.index.get_by_category(category)
    }

    /// Answers one question. Never fails; fires the transfer notification at most once.
    pub async fn answer(&self, question: &str) -> Response {
        let response = match self.route(question) {
            Route::SmallTalk => Response::new(
                question,
                small_talk_reply(question),
                ResponseSource::SmallTalk,
            ),
            Route::Matched(entry) => self.answer_from_entry(question, entry).await,
            Route::Augmented(generator) => {
                match self.answer_without_context(question, generator).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!(
                            target: "faqbot::router",
                            generator = generator.name(),
                            error = %e,
                            "Augmentation failed, handing off"
                        );
                        self.hand_off(question, REASON_GENERATION_FAILED)
                    }
                }
            }
            Route::Unanswerable => self.hand_off(question, REASON_NO_RELEVANT_INFO),
        };

        tracing::debug!(
            target: "faqbot::router",
            source = %response.source,
            transfer = response.transfer_to_agent,
            "Question answered"
        );
        response
    }

    fn route(&self, question: &str) -> Route<'_> {
        match (self.index.search(question, self.threshold), &self.generator) {
            (None, _) if is_small_talk(question) => Route::SmallTalk,
            (Some(entry), _) => Route::Matched(entry),
            (None, Some(generator)) => Route::Augmented(generator.as_ref()),
            (None, None) => Route::Unanswerable,
        }
    }

    /// Knowledge-base answer, rewritten by the generator when one is configured.
    /// A generator failure falls back to the stored answer.
    async fn answer_from_entry(&self, question: &str, entry: &Entry) -> Response {
        let source = ResponseSource::KnowledgeBase {
            category: entry.category.clone(),
        };
        let Some(generator) = &self.generator else {
            return Response::new(question, entry.answer.as_str(), source);
        };

        let context = format!(
            "Pregunta relacionada: {}\nRespuesta: {}",
            entry.question, entry.answer
        );
        match generator.generate(&context, question).await {
            Ok(answer) => Response::new(question, answer, source),
            Err(e) => {
                tracing::warn!(
                    target: "faqbot::router",
                    generator = generator.name(),
                    error = %e,
                    "Augmentation failed, using stored answer"
                );
                Response::new(question, entry.answer.as_str(), source)
            }
        }
    }

    /// Generator answer with no knowledge-base context, then an optional transfer judgment.
    /// Any failure here, the judge included, is reported to the caller as one failure.
    async fn answer_without_context(
        &self,
        question: &str,
        generator: &dyn Generator,
    ) -> Result<Response, CapabilityFailure> {
        let answer = generator.generate(NO_CONTEXT_MARKER, question).await?;
        let response = Response::new(question, answer, ResponseSource::Llm);

        let Some(judge) = &self.judge else {
            return Ok(response);
        };
        let verdict = judge.judge(question, NO_RESULTS_MARKER).await?;
        // Greetings are never escalated, whatever the judge says.
        if verdict.should_transfer && !is_small_talk(question) {
            self.notify_transfer(question);
            return Ok(response.with_transfer(verdict.reason));
        }
        Ok(response)
    }

    fn hand_off(&self, question: &str, reason: &str) -> Response {
        self.notify_transfer(question);
        Response::new(question, APOLOGY_HANDOFF_MESSAGE, ResponseSource::Transfer)
            .with_transfer(reason)
    }

    fn notify_transfer(&self, question: &str) {
        if let Err(e) = self.notifier.notify(question) {
            tracing::warn!(target: "faqbot::router", error = %e, "Transfer notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::FaqRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Generator returning a fixed result and recording the contexts it saw.
    struct ScriptedGenerator {
        reply: Option<String>,
        contexts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                contexts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                contexts: Mutex::new(Vec::new()),
            })
        }

        fn contexts(&self) -> Vec<String> {
            self.contexts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Generator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, context: &str, _question: &str) -> Result<String, CapabilityFailure> {
            self.contexts.lock().unwrap().push(context.to_string());
            self.reply
                .clone()
                .ok_or_else(|| CapabilityFailure::Request("connection refused".into()))
        }
    }

    struct ScriptedJudge {
        verdict: Option<TransferVerdict>,
        calls: AtomicUsize,
        last_tag: Mutex<Option<String>>,
    }

    impl ScriptedJudge {
        fn says(should_transfer: bool, reason: &str) -> Arc<Self> {
            Arc::new(Self {
                verdict: Some(TransferVerdict {
                    should_transfer,
                    reason: reason.to_string(),
                }),
                calls: AtomicUsize::new(0),
                last_tag: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                verdict: None,
                calls: AtomicUsize::new(0),
                last_tag: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl TransferJudge for ScriptedJudge {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn judge(
            &self,
            _question: &str,
            search_result: &str,
        ) -> Result<TransferVerdict, CapabilityFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_tag.lock().unwrap() = Some(search_result.to_string());
            self.verdict
                .clone()
                .ok_or_else(|| CapabilityFailure::InvalidResponse("no verdict".into()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        questions: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn questions(&self) -> Vec<String> {
            self.questions.lock().unwrap().clone()
        }
    }

    impl TransferNotifier for RecordingNotifier {
        fn notify(&self, question: &str) -> Result<(), CapabilityFailure> {
            self.questions.lock().unwrap().push(question.to_string());
            Ok(())
        }
    }

    struct BrokenNotifier;

    impl TransferNotifier for BrokenNotifier {
        fn notify(&self, _question: &str) -> Result<(), CapabilityFailure> {
            Err(CapabilityFailure::Unavailable("webhook down".into()))
        }
    }

    fn schedule_index() -> Arc<KnowledgeIndex> {
        Arc::new(
            KnowledgeIndex::from_records(vec![FaqRecord::new(
                "¿Cuál es el horario de atención?",
                "Lunes a viernes de 9 a 18",
                Some("Horarios"),
            )])
            .unwrap(),
        )
    }

    fn empty_index() -> Arc<KnowledgeIndex> {
        Arc::new(KnowledgeIndex::default())
    }

    fn router_with_notifier(index: Arc<KnowledgeIndex>) -> (ResponseRouter, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let router = ResponseRouter::new(index).with_notifier(notifier.clone());
        (router, notifier)
    }

    #[tokio::test]
    async fn matched_entry_without_generator_returns_stored_answer() {
        let (router, notifier) = router_with_notifier(schedule_index());
        let response = router.answer("¿Cuál es el horario?").await;
        assert_eq!(response.answer, "Lunes a viernes de 9 a 18");
        assert_eq!(response.source.category(), Some("Horarios"));
        assert!(response.source.to_string().contains("Horarios"));
        assert!(!response.transfer_to_agent);
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn greeting_on_empty_index_is_small_talk() {
        let (router, notifier) = router_with_notifier(empty_index());
        let response = router.answer("Hola").await;
        assert_eq!(response.source, ResponseSource::SmallTalk);
        assert_eq!(response.answer, GREETING_REPLY);
        assert!(!response.transfer_to_agent);
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn thanks_get_the_thanks_reply() {
        let (router, _) = router_with_notifier(empty_index());
        let response = router.answer("muchas gracias").await;
        assert_eq!(response.answer, THANKS_REPLY);
    }

    #[tokio::test]
    async fn unknown_question_without_generator_hands_off_once() {
        let (router, notifier) = router_with_notifier(empty_index());
        let question = "¿Puedo personalizar el color?";
        let response = router.answer(question).await;
        assert!(response.transfer_to_agent);
        assert_eq!(response.source, ResponseSource::Transfer);
        assert_eq!(response.answer, APOLOGY_HANDOFF_MESSAGE);
        assert_eq!(response.transfer_reason, REASON_NO_RELEVANT_INFO);
        assert_eq!(notifier.questions(), vec![question.to_string()]);
    }

    #[tokio::test]
    async fn failing_generator_without_match_forces_transfer() {
        let generator = ScriptedGenerator::failing();
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router.with_generator(Some(generator.clone()));
        let response = router.answer("¿Hacen envíos internacionales?").await;
        assert!(response.transfer_to_agent);
        assert_eq!(response.transfer_reason, REASON_GENERATION_FAILED);
        assert_eq!(response.source, ResponseSource::Transfer);
        assert_eq!(response.answer, APOLOGY_HANDOFF_MESSAGE);
        assert_eq!(notifier.questions().len(), 1);
        assert_eq!(generator.contexts(), vec![NO_CONTEXT_MARKER.to_string()]);
    }

    #[tokio::test]
    async fn generator_rewrites_matched_answer_with_entry_context() {
        let generator = ScriptedGenerator::ok("Atendemos de lunes a viernes, 9 a 18 h.");
        let router = ResponseRouter::new(schedule_index()).with_generator(Some(generator.clone()));
        let response = router.answer("¿Cuál es el horario?").await;
        assert_eq!(response.answer, "Atendemos de lunes a viernes, 9 a 18 h.");
        assert_eq!(response.source.category(), Some("Horarios"));
        assert_eq!(
            generator.contexts(),
            vec![
                "Pregunta relacionada: ¿Cuál es el horario de atención?\nRespuesta: Lunes a viernes de 9 a 18"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn failing_generator_with_match_falls_back_to_stored_answer() {
        let (router, notifier) = router_with_notifier(schedule_index());
        let router = router.with_generator(Some(ScriptedGenerator::failing()));
        let response = router.answer("¿Cuál es el horario?").await;
        assert_eq!(response.answer, "Lunes a viernes de 9 a 18");
        assert!(!response.transfer_to_agent);
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn generated_answer_without_judge_is_llm_sourced() {
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router.with_generator(Some(ScriptedGenerator::ok("Depende del modelo.")));
        let response = router.answer("¿Puedo personalizar el color?").await;
        assert_eq!(response.source, ResponseSource::Llm);
        assert_eq!(response.answer, "Depende del modelo.");
        assert!(!response.transfer_to_agent);
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn affirmative_judge_transfers_with_its_reason() {
        let judge = ScriptedJudge::says(true, "Requiere cotización personalizada");
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router
            .with_generator(Some(ScriptedGenerator::ok("Un agente le ayudará.")))
            .with_transfer_judge(Some(judge.clone()));
        let question = "¿Puedo personalizar el color?";
        let response = router.answer(question).await;
        assert_eq!(response.source, ResponseSource::Llm);
        assert_eq!(response.answer, "Un agente le ayudará.");
        assert!(response.transfer_to_agent);
        assert_eq!(response.transfer_reason, "Requiere cotización personalizada");
        assert_eq!(notifier.questions(), vec![question.to_string()]);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            judge.last_tag.lock().unwrap().as_deref(),
            Some(NO_RESULTS_MARKER)
        );
    }

    #[tokio::test]
    async fn negative_judge_keeps_generated_answer() {
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router
            .with_generator(Some(ScriptedGenerator::ok("Sí, es posible.")))
            .with_transfer_judge(Some(ScriptedJudge::says(false, "Respondida")));
        let response = router.answer("¿Puedo personalizar el color?").await;
        assert!(!response.transfer_to_agent);
        assert_eq!(response.transfer_reason, "");
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn failing_judge_counts_as_generation_failure() {
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router
            .with_generator(Some(ScriptedGenerator::ok("Texto generado")))
            .with_transfer_judge(Some(ScriptedJudge::failing()));
        let response = router.answer("¿Puedo personalizar el color?").await;
        assert!(response.transfer_to_agent);
        assert_eq!(response.transfer_reason, REASON_GENERATION_FAILED);
        assert_eq!(response.answer, APOLOGY_HANDOFF_MESSAGE);
        assert_eq!(notifier.questions().len(), 1);
    }

    #[tokio::test]
    async fn small_talk_never_reaches_capabilities() {
        let generator = ScriptedGenerator::ok("unused");
        let judge = ScriptedJudge::says(true, "always");
        let (router, notifier) = router_with_notifier(empty_index());
        let router = router
            .with_generator(Some(generator.clone()))
            .with_transfer_judge(Some(judge.clone()));
        let response = router.answer("buenas tardes").await;
        assert_eq!(response.source, ResponseSource::SmallTalk);
        assert!(!response.transfer_to_agent);
        assert!(generator.contexts().is_empty());
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.questions().is_empty());
    }

    #[tokio::test]
    async fn knowledge_match_wins_over_small_talk() {
        let index = Arc::new(
            KnowledgeIndex::from_records(vec![FaqRecord::new(
                "Hola, ¿cómo contacto a soporte?",
                "Escríbanos a soporte@ejemplo.com",
                Some("Contacto"),
            )])
            .unwrap(),
        );
        let router = ResponseRouter::new(index);
        let response = router.answer("hola").await;
        assert_eq!(response.source.category(), Some("Contacto"));
    }

    #[tokio::test]
    async fn notifier_failure_does_not_block_the_response() {
        let router = ResponseRouter::new(empty_index()).with_notifier(Arc::new(BrokenNotifier));
        let response = router.answer("¿Puedo personalizar el color?").await;
        assert!(response.transfer_to_agent);
        assert_eq!(response.answer, APOLOGY_HANDOFF_MESSAGE);
    }

    #[tokio::test]
    async fn custom_threshold_is_respected() {
        let router = ResponseRouter::new(schedule_index()).with_threshold(10.0);
        let response = router.answer("¿Cuál es el horario?").await;
        assert_eq!(response.source, ResponseSource::Transfer);
    }

    #[test]
    fn fallback_mode_and_pass_throughs() {
        let router = ResponseRouter::new(schedule_index());
        assert!(router.is_fallback_mode());
        assert_eq!(router.all_entries().len(), 1);
        assert_eq!(router.entries_by_category("HORARIOS").len(), 1);
        assert!(!router
            .with_generator(Some(ScriptedGenerator::ok("x")))
            .is_fallback_mode());
    }
}
