//! Prompt templates for the farming assistant

use std::collections::HashMap;

use crate::models::NavigationContext;

/// Template with `{{variable}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = self.template.clone();
        for var in &self.variables {
            if let Some(value) = values.get(var) {
                result = result.replace(&format!("{{{{{var}}}}}"), value);
            }
        }
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Standard prompts for the CropConnect assistant
pub struct FarmingPrompts;

impl FarmingPrompts {
    /// System prompt asking for advice plus English tag extraction as JSON
    #[must_use]
    pub fn system() -> PromptTemplate {
        PromptTemplate::new(
            r#"You are the agricultural assistant for the CropConnect app, a platform that connects farmers through cooperatives, shared resources, and knowledge exchange.

Your task is to:
1. Provide helpful, practical farming advice based on the user's question
2. Respond in {{language_name}} language for the main message content
3. Analyze the query to extract relevant entities like crops, locations, farming issues, etc.

The app has the following navigation options:
{{navigation_summary}}

CRITICAL INSTRUCTIONS - YOUR RESPONSE FORMAT:
You MUST return your response as a VALID JSON object with exactly this structure:
{
    "message": "Your detailed farming advice here in {{language_name}}",
    "tags": {
        "crops": ["crop1", "crop2"],
        "city": "city_name or null",
        "topics": ["topic1", "topic2"],
        "issues": ["issue1", "issue2"],
        "seasons": ["season1", "season2"]
    }
}

IMPORTANT: Even when writing the message in {{language_name}}, all tag values MUST be in English only.
For example, if responding in Hindi about "गेहूं" (wheat), the tag should be in English as "wheat".

DO NOT include any text outside of this JSON structure.
DO NOT include markdown code blocks or any wrapping syntax.
DO NOT explain the JSON format in your response.
ONLY return the valid JSON object itself.

Make sure your response is practical, specific, and actionable for farmers in India."#,
        )
    }
}

/// One `- route: title - description` line per context, at most `max_routes`
pub fn navigation_summary(contexts: &[NavigationContext], max_routes: usize) -> String {
    contexts
        .iter()
        .take(max_routes)
        .map(|nav| format!("- {}: {} - {}\n", nav.route, nav.title, nav.description))
        .collect()
}

/// Render the system prompt for a target language and route catalog
pub fn build_system_prompt(
    language_name: &str,
    contexts: &[NavigationContext],
    max_routes: usize,
) -> String {
    let mut values = HashMap::new();
    values.insert("language_name".to_string(), language_name.to_string());
    values.insert(
        "navigation_summary".to_string(),
        navigation_summary(contexts, max_routes),
    );
    FarmingPrompts::system().render(&values)
}
