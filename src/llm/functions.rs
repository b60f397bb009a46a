//! Fixed output schemas for the three forced function calls.

use crate::llm::client::FunctionSpec;
use crate::llm::prompts::*;

/// Schema for the speaker classifier: each anonymous tag is independently
/// assigned one of exactly two roles.
pub fn label_speakers() -> FunctionSpec {
    FunctionSpec {
        name: "speaker_classifier",
        description: "Identifies between salesperson and customer",
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "speaker_0": {
                    "type": "string",
                    "enum": ["salesperson: ", "customer: "],
                    "description": SPEAKER_0_DESCRIPTION,
                },
                "speaker_1": {
                    "type": "string",
                    "enum": ["salesperson: ", "customer: "],
                    "description": SPEAKER_1_DESCRIPTION,
                },
            },
            "required": ["speaker_0", "speaker_1"],
        }),
    }
}

/// Schema for the call summary extraction.
pub fn summarize_call() -> FunctionSpec {
    FunctionSpec {
        name: "summarize",
        description: "Summarizes the conversation and highlights key points.",
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": SUMMARY_TITLE},
                "discussion_points": {"type": "string", "description": SUMMARY_DISCUSSION_POINTS},
                "customer_queries": {"type": "string", "description": SUMMARY_CUSTOMER_QUERIES},
                "next_action_items": {"type": "string", "description": SUMMARY_NEXT_ACTION_ITEMS},
                "meeting_request_attempt": {"type": "string", "description": SUMMARY_MEETING_REQUEST_ATTEMPT},
            },
            "required": [
                "title",
                "discussion_points",
                "customer_queries",
                "next_action_items",
                "meeting_request_attempt",
            ],
        }),
    }
}

/// Schema for the eight-parameter rating evaluation.
pub fn evaluate_parameters() -> FunctionSpec {
    FunctionSpec {
        name: "call_analysis",
        description: "Shows a detailed analysis of the call.",
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "rudeness_or_politeness_metric": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_RUDENESS_POLITENESS,
                },
                "salesperson_company_introduction": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_COMPANY_INTRODUCTION,
                },
                "meeting_request": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_MEETING_REQUEST,
                },
                "salesperson_understanding_of_customer_requirements": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_REQUIREMENT_UNDERSTANDING,
                },
                "customer_sentiment_by_the_end_of_call": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_CUSTOMER_SENTIMENT,
                },
                "customer_eagerness_to_buy": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 4,
                    "description": RATING_CUSTOMER_EAGERNESS,
                },
                "customer_budget": {
                    "type": "string",
                    "description": RATING_CUSTOMER_BUDGET,
                },
                "customer_preferences": {
                    "type": "string",
                    "description": RATING_CUSTOMER_PREFERENCES,
                },
            },
            "required": [
                "rudeness_or_politeness_metric",
                "salesperson_company_introduction",
                "meeting_request",
                "salesperson_understanding_of_customer_requirements",
                "customer_sentiment_by_the_end_of_call",
                "customer_eagerness_to_buy",
                "customer_budget",
                "customer_preferences",
            ],
        }),
    }
}
