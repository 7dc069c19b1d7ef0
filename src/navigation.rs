//! Navigation suggestions scored from the message text and extracted tags

use std::collections::HashMap;
use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::models::AppContext;
use crate::models::NavigationContext;
use crate::models::Tags;
use crate::Result;

pub const ROUTE_CHATBOT: &str = "/chatbot";
pub const ROUTE_PODCASTS: &str = "/podcasts";
pub const ROUTE_COMMUNITY: &str = "/community";
pub const ROUTE_RESOURCE_POOL: &str = "/resource-pool";
pub const ROUTE_SEARCH_COOPERATIVES: &str = "/search-cooperatives";
pub const ROUTE_NEARBY_COOPERATIVES: &str = "/nearby-cooperatives";

/// Returned when no route scores above zero
pub const DEFAULT_NAVIGATIONS: [&str; 3] = [ROUTE_CHATBOT, ROUTE_PODCASTS, ROUTE_COMMUNITY];

/// Maximum number of scored routes kept before the chatbot is appended
pub const MAX_SUGGESTIONS: usize = 3;

const KEYWORD_POINTS: u32 = 2;
const CROP_ROUTES: [&str; 3] = [ROUTE_RESOURCE_POOL, ROUTE_PODCASTS, ROUTE_CHATBOT];
const CITY_ROUTES: [&str; 2] = [ROUTE_SEARCH_COOPERATIVES, ROUTE_NEARBY_COOPERATIVES];
const LEARNING_TOPICS: [&str; 3] = ["cultivation", "farming techniques", "agricultural education"];
const HELP_TERMS: [&str; 4] = ["help", "advice", "problem", "issue"];
const DISCUSSION_TERMS: [&str; 3] = ["discuss", "talk", "other farmers"];

struct RouteKeywords {
    route: String,
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

/// Scores every known route against a message. Immutable after construction.
pub struct NavigationService {
    routes: Vec<RouteKeywords>,
    by_route: HashMap<String, NavigationContext>,
}

impl NavigationService {
    /// Build keyword matchers for every context that has a route. A repeated
    /// route replaces the earlier definition but keeps its position.
    pub fn new(app_context: &AppContext) -> Result<Self> {
        let mut routes: Vec<RouteKeywords> = Vec::new();
        let mut by_route = HashMap::new();

        for context in &app_context.navigation_contexts {
            if context.route.is_empty() {
                continue;
            }

            let mut seen = HashSet::new();
            let keywords: Vec<String> = context
                .intent_keywords
                .iter()
                .chain(&context.user_needs)
                .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.as_str()))
                .cloned()
                .collect();
            let patterns = keywords
                .iter()
                .map(|keyword| Regex::new(&format!(r"\b{}\b", regex::escape(&keyword.to_lowercase()))))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let entry = RouteKeywords {
                route: context.route.clone(),
                keywords,
                patterns,
            };
            match routes.iter_mut().find(|r| r.route == context.route) {
                Some(existing) => *existing = entry,
                None => routes.push(entry),
            }
            by_route.insert(context.route.clone(), context.clone());
        }

        debug!("Navigation service loaded {} routes", routes.len());
        Ok(Self { routes, by_route })
    }

    /// Routes in load order
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.route.as_str())
    }

    /// Deduplicated keyword set for `route`
    pub fn keywords(&self, route: &str) -> Option<&[String]> {
        self.routes
            .iter()
            .find(|r| r.route == route)
            .map(|r| r.keywords.as_slice())
    }

    pub fn context(&self, route: &str) -> Option<&NavigationContext> {
        self.by_route.get(route)
    }

    /// Score of every route, in load order
    pub fn score_routes(&self, message: &str, tags: &Tags) -> Vec<(String, u32)> {
        let message = message.to_lowercase();
        self.routes
            .iter()
            .map(|entry| (entry.route.clone(), score_route(entry, &message, tags)))
            .collect()
    }

    /// Up to three best-scoring routes, plus the chatbot when it did not
    /// make the cut. Falls back to [`DEFAULT_NAVIGATIONS`] when nothing scores.
    pub fn suggest_navigations(&self, message: &str, tags: &Tags) -> Vec<String> {
        let mut scores = self.score_routes(message, tags);
        // Stable: equal scores keep load order
        scores.sort_by(|a, b| b.1.cmp(&a.1));

        let mut suggestions: Vec<String> = scores
            .into_iter()
            .filter(|(_, score)| *score > 0)
            .take(MAX_SUGGESTIONS)
            .map(|(route, _)| route)
            .collect();

        if suggestions.is_empty() {
            return DEFAULT_NAVIGATIONS.iter().map(ToString::to_string).collect();
        }

        if !suggestions.iter().any(|route| route == ROUTE_CHATBOT) {
            suggestions.push(ROUTE_CHATBOT.to_string());
        }

        debug!("Suggested navigations: {:?}", suggestions);
        suggestions
    }
}

/// `message` must already be lowercase
fn score_route(entry: &RouteKeywords, message: &str, tags: &Tags) -> u32 {
    let route = entry.route.as_str();
    let mut score = 0;

    score += KEYWORD_POINTS
        * entry
            .patterns
            .iter()
            .filter(|pattern| pattern.is_match(message))
            .count() as u32;

    if tags.has_crops() && CROP_ROUTES.contains(&route) {
        score += 3;
    }

    if tags.has_city() && CITY_ROUTES.contains(&route) {
        score += 3;
    }

    if route == ROUTE_PODCASTS
        && (message.contains("learn")
            || message.contains("information")
            || tags
                .topics
                .iter()
                .any(|topic| LEARNING_TOPICS.contains(&topic.as_str())))
    {
        score += 3;
    }

    if route == ROUTE_RESOURCE_POOL && (message.contains("equipment") || message.contains("tools")) {
        score += 2;
    }

    if route == ROUTE_CHATBOT
        && (HELP_TERMS.iter().any(|term| message.contains(term)) || tags.has_issues())
    {
        score += 4;
    }

    if route == ROUTE_COMMUNITY && DISCUSSION_TERMS.iter().any(|term| message.contains(term)) {
        score += 2;
    }

    // These two stack on top of the crop and issue bonuses above
    if tags.has_crops() && route == ROUTE_CHATBOT {
        score += 3;
    }

    if tags.has_issues() && route == ROUTE_COMMUNITY {
        score += 2;
    }

    score
}
