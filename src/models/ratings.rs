use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// All numeric ratings use this single scale.
pub const RATING_SCALE: RangeInclusive<u8> = 1..=4;

/// Rating evaluation over the labeled transcript.
///
/// The six metrics are bounded integers on [`RATING_SCALE`]; the budget and
/// preferences are free-form strings. Field names match the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsRecord {
    pub rudeness_or_politeness_metric: u8,
    pub salesperson_company_introduction: u8,
    pub meeting_request: u8,
    pub salesperson_understanding_of_customer_requirements: u8,
    pub customer_sentiment_by_the_end_of_call: u8,
    pub customer_eagerness_to_buy: u8,
    pub customer_budget: String,
    pub customer_preferences: String,
}

impl RatingsRecord {
    /// Check every numeric metric against the rating scale. Returns the name
    /// of the first out-of-range field.
    pub fn validate_scale(&self) -> Result<(), String> {
        let metrics = [
            (
                "rudeness_or_politeness_metric",
                self.rudeness_or_politeness_metric,
            ),
            (
                "salesperson_company_introduction",
                self.salesperson_company_introduction,
            ),
            ("meeting_request", self.meeting_request),
            (
                "salesperson_understanding_of_customer_requirements",
                self.salesperson_understanding_of_customer_requirements,
            ),
            (
                "customer_sentiment_by_the_end_of_call",
                self.customer_sentiment_by_the_end_of_call,
            ),
            ("customer_eagerness_to_buy", self.customer_eagerness_to_buy),
        ];

        for (name, value) in metrics {
            if !RATING_SCALE.contains(&value) {
                return Err(format!(
                    "{name} is {value}, outside the {}-{} scale",
                    RATING_SCALE.start(),
                    RATING_SCALE.end()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RatingsRecord {
        RatingsRecord {
            rudeness_or_politeness_metric: 3,
            salesperson_company_introduction: 2,
            meeting_request: 4,
            salesperson_understanding_of_customer_requirements: 3,
            customer_sentiment_by_the_end_of_call: 3,
            customer_eagerness_to_buy: 2,
            customer_budget: "80L-1Cr".to_string(),
            customer_preferences: "3BHK near Gurgaon".to_string(),
        }
    }

    #[test]
    fn test_in_scale_ratings_pass() {
        assert!(sample().validate_scale().is_ok());
    }

    #[test]
    fn test_out_of_scale_rating_is_named() {
        let mut ratings = sample();
        ratings.meeting_request = 5;

        let err = ratings.validate_scale().unwrap_err();
        assert!(err.contains("meeting_request"), "{err}");
    }

    #[test]
    fn test_missing_customer_budget_is_rejected() {
        let json = serde_json::json!({
            "rudeness_or_politeness_metric": 3,
            "salesperson_company_introduction": 2,
            "meeting_request": 4,
            "salesperson_understanding_of_customer_requirements": 3,
            "customer_sentiment_by_the_end_of_call": 3,
            "customer_eagerness_to_buy": 2,
            "customer_preferences": "3BHK"
        });

        let result: Result<RatingsRecord, _> = serde_json::from_value(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("customer_budget"), "{err}");
    }
}
