/*!
 * Integration tests for the two-stage translation pipeline.
 *
 * Every test drives the real chunker, prompts and filter against a
 * `MockProvider` standing in for the inference service.
 */

use std::sync::Arc;

use newsbridge::errors::{ProviderError, Stage, TranslationError};
use newsbridge::providers::mock::MockProvider;
use newsbridge::translation::{
    Article, Document, FormatSkipReason, PipelineEvent, PipelineOutcome, PipelineSettings,
};

use crate::common::{RecordingObserver, init_logging, mock_pipeline, paragraph, sample_article_body};

fn nine_thousand_char_body() -> String {
    [
        paragraph("market", 1700),
        paragraph("bank", 1700),
        paragraph("rates", 1700),
        paragraph("stocks", 1700),
        paragraph("dollar", 2192),
    ]
    .join("\n\n")
}

#[tokio::test]
async fn test_translate_withShortBody_shouldSendOneUnfilteredRequest() {
    init_logging();
    let provider = MockProvider::working().with_responder(|_| "Xin chào thế giới.".to_string());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let result = pipeline.translate("Hello world.", "T").await;

    assert_eq!(result.as_deref(), Some("Xin chào thế giới."));
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Title: T"));
    assert!(prompts[0].ends_with("Hello world."));
    assert!(!prompts[0].contains("part 1/"));
}

#[tokio::test]
async fn test_translate_withShortCommentaryLikeReply_shouldNotFilter() {
    let provider = MockProvider::working().with_responder(|_| "Could you clarify?".to_string());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    assert_eq!(pipeline.translate("Hello world.", "T").await.as_deref(), Some("Could you clarify?"));
}

#[tokio::test]
async fn test_translateStage_withFiveParagraphs_shouldSendThreeOrderedChunks() {
    init_logging();
    let provider = MockProvider::working().with_responder(|prompt| {
        let part = if prompt.contains("part 1/3") {
            "Phần một."
        } else if prompt.contains("part 2/3") {
            "Phần hai."
        } else {
            "Phần ba."
        };
        part.to_string()
    });
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let body = nine_thousand_char_body();
    assert_eq!(body.chars().count(), 9000);
    let translated = pipeline.translate_stage(&body, "Markets slide").await.unwrap();

    assert_eq!(translated, "Phần một.\n\nPhần hai.\n\nPhần ba.");
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("Title: Markets slide"));
    assert!(!prompts[1].contains("Markets slide"));
    assert!(!prompts[2].contains("Markets slide"));
    assert!(prompts[1].contains("part 2/3 of the same article"));
}

#[tokio::test]
async fn test_translateDocument_withShortTranslation_shouldSkipFormatting() {
    let translation = paragraph("dịch", 300);
    let reply = translation.clone();
    let provider = MockProvider::working().with_responder(move |_| reply.clone());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let report = pipeline
        .translate_document(&Document::new("Title", sample_article_body()))
        .await;

    assert!(matches!(
        report.outcome,
        PipelineOutcome::RawTranslationOnly {
            reason: FormatSkipReason::TooShort { length: 300, threshold: 400 },
            ..
        }
    ));
    assert_eq!(report.text(), Some(translation.as_str()));
    assert_eq!(report.format_chunks, 0);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_translateDocument_withLongTranslation_shouldFormat() {
    init_logging();
    let provider = MockProvider::working().with_responder(|prompt| {
        if prompt.starts_with("Reformat") {
            "## Tiêu đề\n\n**Lãi suất** tăng.".to_string()
        } else {
            paragraph("dịch", 600)
        }
    });
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default()).with_observer(observer.clone());

    let report = pipeline
        .translate_document(&Document::new("Title", sample_article_body()))
        .await;

    assert!(matches!(&report.outcome, PipelineOutcome::Formatted(text) if text.starts_with("## Tiêu đề")));
    assert_eq!((report.translate_chunks, report.format_chunks, report.requests), (1, 1, 2));

    let stages: Vec<Stage> = observer
        .events()
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageCompleted { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec![Stage::Translate, Stage::Format]);
}

#[tokio::test]
async fn test_translateDocument_whenChunkExhaustsRetries_shouldFailDocument() {
    init_logging();
    let provider = MockProvider::working().with_script(vec![
        Ok("Phần một đã dịch.".to_string()),
        Err(ProviderError::ConnectionError("reset".to_string())),
        Err(ProviderError::ConnectionError("reset".to_string())),
        Err(ProviderError::ConnectionError("reset".to_string())),
    ]);
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default()).with_observer(observer.clone());

    let report = pipeline
        .translate_document(&Document::new("Markets", nine_thousand_char_body()))
        .await;

    assert!(matches!(
        report.outcome,
        PipelineOutcome::Failed(TranslationError::ChunkFailed {
            stage: Stage::Translate,
            index: 2,
            total: 3
        })
    ));
    assert_eq!(report.text(), None);
    // Chunk 3 is never sent
    assert_eq!(provider.request_count(), 4);
    assert_eq!(report.requests, 4);

    let failed_attempts = observer
        .events()
        .iter()
        .filter(|e| matches!(e, PipelineEvent::RequestFailed { .. }))
        .count();
    assert_eq!(failed_attempts, 3);
}

#[tokio::test]
async fn test_translate_whenChunkFails_shouldReturnNone() {
    let provider = MockProvider::failing();
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    assert_eq!(pipeline.translate(&sample_article_body(), "T").await, None);
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_translateDocument_whenFormatFails_shouldReturnRawTranslation() {
    let translation = paragraph("dịch", 800);
    let reply = translation.clone();
    let provider = MockProvider::working().with_responder(move |prompt| {
        if prompt.starts_with("Reformat") { String::new() } else { reply.clone() }
    });
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = mock_pipeline(&provider, PipelineSettings::default()).with_observer(observer.clone());

    let report = pipeline
        .translate_document(&Document::new("Title", sample_article_body()))
        .await;

    assert!(matches!(
        report.outcome,
        PipelineOutcome::RawTranslationOnly {
            reason: FormatSkipReason::FormatFailed,
            ..
        }
    ));
    assert_eq!(report.text(), Some(translation.as_str()));
    assert!(observer.events().contains(&PipelineEvent::FormatFallback));
}

#[tokio::test]
async fn test_translateDocument_whenLaterFormatChunkFails_shouldDiscardFormattedParts() {
    init_logging();
    let translation = [paragraph("một", 600), paragraph("hai", 600), paragraph("ba", 600)].join("\n\n");
    let reply = translation.clone();
    let provider = MockProvider::working().with_responder(move |prompt| {
        if !prompt.starts_with("Reformat") {
            reply.clone()
        } else if prompt.contains("[Part 2/3") {
            String::new()
        } else {
            "**ĐÃ ĐỊNH DẠNG**".to_string()
        }
    });
    let settings = PipelineSettings {
        format_max_chars: 1000,
        ..PipelineSettings::default()
    };
    let pipeline = mock_pipeline(&provider, settings);

    let report = pipeline
        .translate_document(&Document::new("Title", sample_article_body()))
        .await;

    assert!(matches!(
        report.outcome,
        PipelineOutcome::RawTranslationOnly {
            reason: FormatSkipReason::FormatFailed,
            ..
        }
    ));
    assert_eq!(report.text(), Some(translation.as_str()));
    assert!(!report.text().unwrap_or_default().contains("ĐÃ ĐỊNH DẠNG"));
    // One translate request, format parts 1 and 2; part 3 is never sent
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_translateDocument_withCommentaryInChunk_shouldStripIt() {
    let provider = MockProvider::working().with_responder(|_| {
        "Ngân hàng trung ương tăng lãi suất thêm một phần tư điểm phần trăm.\n\n\
It seems the text you provided is a news article. Let me know!"
            .to_string()
    });
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let result = pipeline.translate(&sample_article_body(), "Rates").await;

    assert_eq!(
        result.as_deref(),
        Some("Ngân hàng trung ương tăng lãi suất thêm một phần tư điểm phần trăm.")
    );
}

#[tokio::test]
async fn test_translate_whenDisabled_shouldNotContactProvider() {
    let provider = MockProvider::working();
    let settings = PipelineSettings {
        enabled: false,
        ..Default::default()
    };
    let pipeline = mock_pipeline(&provider, settings);

    assert_eq!(pipeline.translate("Hello world.", "T").await, None);
    assert_eq!(pipeline.translate_short("Hello").await, None);
    assert_eq!(pipeline.translate_title_and_summary("T", Some("S")).await, (None, None));
    assert!(matches!(pipeline.format_stage("x").await, Err(TranslationError::Disabled)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateTitleAndSummary_shouldFailIndependently() {
    let provider = MockProvider::working().with_script(vec![
        Ok("Fed tăng lãi suất".to_string()),
        Err(ProviderError::ConnectionError("down".to_string())),
        Err(ProviderError::ConnectionError("down".to_string())),
        Err(ProviderError::ConnectionError("down".to_string())),
    ]);
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let (title, summary) = pipeline
        .translate_title_and_summary("Fed raises rates", Some("The Fed acted again."))
        .await;

    assert_eq!(title.as_deref(), Some("Fed tăng lãi suất"));
    assert_eq!(summary, None);
    assert!(provider.prompts()[0].starts_with("Translate into Vietnamese."));
}

#[tokio::test]
async fn test_translateArticle_shouldFillEachField() {
    let provider = MockProvider::working().with_responder(|prompt| {
        if prompt.starts_with("Translate into") {
            "Ngắn gọn".to_string()
        } else {
            "Nội dung đã dịch.".to_string()
        }
    });
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());
    let article = Article {
        title: "Fed raises rates".to_string(),
        summary: None,
        content: sample_article_body(),
    };

    let translation = pipeline.translate_article(&article).await;

    assert_eq!(translation.title.as_deref(), Some("Ngắn gọn"));
    assert_eq!(translation.summary, None);
    assert_eq!(translation.content.as_deref(), Some("Nội dung đã dịch."));
    // Title, then one body chunk; the body is too short to format
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_pipeline_concurrentDocuments_shouldNotInterfere() {
    let provider = MockProvider::working().with_responder(|prompt| {
        if prompt.contains("alpha") { "A".to_string() } else { "B".to_string() }
    });
    let pipeline = mock_pipeline(&provider, PipelineSettings::default());

    let (a, b) = tokio::join!(pipeline.translate("alpha text", "1"), pipeline.translate("beta text", "2"));

    assert_eq!(a.as_deref(), Some("A"));
    assert_eq!(b.as_deref(), Some("B"));
}
