//! Console rendering and the interactive chat loop.

use faqbot_core::{CapabilityFailure, CoreConfig, KnowledgeIndex, ResponseRouter, TransferNotifier};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const RULE: &str = "============================================================";
const FAREWELL: &str = "¡Hasta luego! Que tenga un excelente día.";
const SHORT_FAREWELL: &str = "¡Hasta luego!";
const HANDOFF_NOTICE: &str = "La conversación será transferida a un agente humano.";
const PREVIEW_CHARS: usize = 100;

/// Prints the hand-off banner to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleTransferNotifier;

impl TransferNotifier for ConsoleTransferNotifier {
    fn notify(&self, question: &str) -> Result<(), CapabilityFailure> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", transfer_banner(question))
            .and_then(|_| stdout.flush())
            .map_err(|e| CapabilityFailure::Unavailable(format!("stdout: {}", e)))
    }
}

pub fn transfer_banner(question: &str) -> String {
    format!(
        "\n{RULE}\n🔄 TRANSFERENCIA A AGENTE HUMANO\n{RULE}\nPregunta: {}\nEstado: Conectando con agente disponible...\nTiempo estimado de espera: 2-3 minutos\n{RULE}\n\n",
        question
    )
}

pub fn welcome_banner(app_name: &str, exit_keyword: &str) -> String {
    format!(
        "\n{RULE}\n💬 {app_name}\n{RULE}\n¡Hola! Soy el asistente virtual de {app_name}.\nPuedo responder preguntas sobre nuestros servicios, horarios,\nubicación, políticas y más.\n\nEscribe '{exit_keyword}' para terminar la conversación.\n{RULE}\n"
    )
}

/// First `max` characters of `text`, with an ellipsis when something was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Entry count, categories (sorted, with counts) and a preview of the first entry.
pub fn inspect_report(index: &KnowledgeIndex) -> String {
    let mut report = format!("Total de FAQs cargadas: {}\n", index.len());

    let mut categories = index.categories();
    categories.sort();
    report.push_str("\nCategorías disponibles:\n");
    for (category, count) in categories {
        report.push_str(&format!("  - {}: {} preguntas\n", category, count));
    }

    if let Some(first) = index.get_all().first() {
        report.push_str("\nEjemplo de FAQ:\n");
        report.push_str(&format!("  Pregunta: {}\n", first.question));
        report.push_str(&format!(
            "  Respuesta: {}\n",
            truncate_chars(&first.answer, PREVIEW_CHARS)
        ));
        report.push_str(&format!("  Categoría: {}\n", first.category));
    }
    report
}

/// Line-oriented chat session. Ends on an exit keyword, after a transfer, on EOF or Ctrl-C.
pub async fn run_chat<R, W>(
    router: &ResponseRouter,
    config: &CoreConfig,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "Tú: ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                writeln!(out, "\n\nChatbot: {}", SHORT_FAREWELL)?;
                return Ok(());
            }
        };
        let Some(line) = line else {
            writeln!(out, "\n\nChatbot: {}", SHORT_FAREWELL)?;
            return Ok(());
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if config.is_exit_keyword(question) {
            writeln!(out, "\nChatbot: {}", FAREWELL)?;
            return Ok(());
        }

        let response = router.answer(question).await;
        writeln!(out, "\nChatbot: {}", response.answer)?;
        writeln!(out, "(Fuente: {})\n", response.source)?;

        if response.transfer_to_agent {
            writeln!(out, "{}\n", HANDOFF_NOTICE)?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqbot_core::{FaqRecord, APOLOGY_HANDOFF_MESSAGE, GREETING_REPLY};
    use std::sync::Arc;

    fn schedule_router() -> ResponseRouter {
        let index = KnowledgeIndex::from_records(vec![FaqRecord::new(
            "¿Cuál es el horario de atención?",
            "Lunes a viernes de 9 a 18",
            Some("Horarios"),
        )])
        .unwrap();
        ResponseRouter::new(Arc::new(index))
    }

    async fn chat(router: &ResponseRouter, input: &str) -> String {
        let mut out = Vec::new();
        run_chat(router, &CoreConfig::default(), input.as_bytes(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn session_skips_blanks_and_ends_on_exit_keyword() {
        let out = chat(
            &schedule_router(),
            "\n   \nHola\n¿Cuál es el horario?\nSALIR\n¿Cuál es el horario?\n",
        )
        .await;
        assert!(out.contains(GREETING_REPLY));
        assert!(out.contains("(Fuente: small_talk)"));
        assert_eq!(out.matches("Lunes a viernes de 9 a 18").count(), 1);
        assert!(out.contains("(Fuente: knowledge_base:Horarios)"));
        assert!(out.contains(FAREWELL));
    }

    #[tokio::test]
    async fn session_ends_after_a_transfer() {
        let router = ResponseRouter::new(Arc::new(KnowledgeIndex::default()));
        let out = chat(&router, "¿Puedo personalizar el color?\nHola\n").await;
        assert!(out.contains(APOLOGY_HANDOFF_MESSAGE));
        assert!(out.contains("(Fuente: transfer)"));
        assert!(out.contains(HANDOFF_NOTICE));
        assert!(!out.contains(GREETING_REPLY));
    }

    #[tokio::test]
    async fn eof_ends_the_session() {
        let out = chat(&schedule_router(), "").await;
        assert!(out.ends_with(&format!("Chatbot: {}\n", SHORT_FAREWELL)));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("corto", 100), "corto");
        assert_eq!(truncate_chars("áéíóú", 3), "áéí...");
        let exact = "a".repeat(100);
        assert_eq!(truncate_chars(&exact, 100), exact);
    }

    #[test]
    fn report_lists_sorted_categories_and_first_entry() {
        let long_answer = "x".repeat(150);
        let index = KnowledgeIndex::from_records(vec![
            FaqRecord::new("¿Dónde están?", long_answer.as_str(), Some("Ubicación")),
            FaqRecord::new("¿Horario?", "9 a 18", Some("Horarios")),
            FaqRecord::new("¿Sábados?", "No", Some("Horarios")),
        ])
        .unwrap();
        let report = inspect_report(&index);
        assert!(report.starts_with("Total de FAQs cargadas: 3\n"));
        let horarios = report.find("  - Horarios: 2 preguntas").unwrap();
        let ubicacion = report.find("  - Ubicación: 1 preguntas").unwrap();
        assert!(horarios < ubicacion);
        assert!(report.contains("  Pregunta: ¿Dónde están?"));
        assert!(report.contains(&format!("  Respuesta: {}...", "x".repeat(100))));
        assert!(!report.contains(&"x".repeat(101)));
    }

    #[test]
    fn banners_carry_their_inputs() {
        assert!(transfer_banner("¿Color?").contains("Pregunta: ¿Color?"));
        let welcome = welcome_banner("Soporte ACME", "salir");
        assert!(welcome.contains("asistente virtual de Soporte ACME"));
        assert!(welcome.contains("Escribe 'salir'"));
    }
}
