use crate::model::lottery::QuizQuestion;
use crate::shared::configuration::CONFIGURATION;
use crate::shared::HTTP_CLIENT;
use serde::Deserialize;
use uuid::Uuid;

/// Fetches quiz questions about a prize product from the generative question
/// service. The service is best-effort: a missing API key, a transport
/// failure or an unusable response all degrade to a single static question
/// about the product, never to an empty list.
pub async fn generate_quiz_questions(
    product_name: &str,
    product_description: &str,
) -> Vec<QuizQuestion> {
    if CONFIGURATION.question_api_key.is_empty() {
        tracing::warn!("No API key for the question service, using the fallback question.");
        return fallback_questions(product_name);
    }

    match request_generated_questions(product_name, product_description).await {
        Ok(questions) if !questions.is_empty() => questions,
        Ok(_) => {
            tracing::warn!("The question service returned no usable questions.");
            fallback_questions(product_name)
        }
        Err(e) => {
            tracing::error!("Failed to generate quiz questions: {}", e);
            fallback_questions(product_name)
        }
    }
}

pub fn fallback_questions(product_name: &str) -> Vec<QuizQuestion> {
    vec![QuizQuestion {
        id: "1".to_string(),
        question: format!("Sample question about {}", product_name),
        options: vec![
            "Yes".to_string(),
            "No".to_string(),
            "Maybe".to_string(),
            "Sure".to_string(),
        ],
        correct_index: 0,
    }]
}

async fn request_generated_questions(
    product_name: &str,
    product_description: &str,
) -> anyhow::Result<Vec<QuizQuestion>> {
    let request_url = format!(
        "{}?key={}",
        CONFIGURATION.question_api_endpoint, CONFIGURATION.question_api_key
    );
    let prompt = format!(
        "Generate 3 fun trivia questions about this product: {} - {}. \
         Return a JSON array of objects with question, options and correctIndex.",
        product_name, product_description
    );
    let request_body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    });

    let response = HTTP_CLIENT
        .post(&request_url)
        .json(&request_body)
        .send()
        .await?
        .error_for_status()?
        .json::<GenerateContentResponse>()
        .await?;

    let generated_json = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.clone())
        .unwrap_or_default();
    Ok(parse_generated_questions(&generated_json))
}

/// Parses the service's JSON payload, dropping malformed questions. Invalid
/// payloads parse to an empty list so the caller falls back.
pub fn parse_generated_questions(payload: &str) -> Vec<QuizQuestion> {
    let generated = serde_json::from_str::<Vec<GeneratedQuestion>>(payload).unwrap_or_default();
    generated
        .into_iter()
        .enumerate()
        .map(|(index, question)| QuizQuestion {
            id: format!("gen-{}-{}", index, Uuid::new_v4()),
            question: question.question,
            options: question.options,
            correct_index: question.correct_index,
        })
        .filter(QuizQuestion::is_valid)
        .collect()
}

#[derive(Deserialize, Clone, Debug)]
struct GeneratedQuestion {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctIndex")]
    correct_index: usize,
}

#[derive(Deserialize, Clone, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GenerateContentCandidate>,
}

#[derive(Deserialize, Clone, Debug)]
struct GenerateContentCandidate {
    content: GenerateContentContent,
}

#[derive(Deserialize, Clone, Debug)]
struct GenerateContentContent {
    #[serde(default)]
    parts: Vec<GenerateContentPart>,
}

#[derive(Deserialize, Clone, Debug)]
struct GenerateContentPart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_contains_the_product_name() {
        let questions = fallback_questions("Truffle Oil Set");

        assert_eq!(questions.len(), 1);
        assert!(questions[0].question.contains("Truffle Oil Set"));
        assert!(questions[0].is_valid());
    }

    #[test]
    fn generated_questions_are_parsed_and_validated() {
        let payload = r#"[
            {"question": "What is silk made from?", "options": ["Cotton", "Silkworm cocoons", "Wool"], "correctIndex": 1},
            {"question": "Only one option", "options": ["Yes"], "correctIndex": 0},
            {"question": "Bad index", "options": ["A", "B"], "correctIndex": 5}
        ]"#;

        let questions = parse_generated_questions(payload);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is silk made from?");
        assert_eq!(questions[0].correct_index, 1);
        assert!(questions[0].id.starts_with("gen-0-"));
    }

    #[test]
    fn unparseable_payload_yields_no_questions() {
        assert!(parse_generated_questions("not json at all").is_empty());
        assert!(parse_generated_questions("{}").is_empty());
    }
}
