//! Fallback handler for messages no intent claims

use crate::chat::response::Response;

/// Keyword-driven canned replies
///
/// Not part of the ordered chain: the engine invokes it only after
/// every registered matcher has declined the message.
#[derive(Debug, Default)]
pub struct GeneralHandler;

impl GeneralHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, message: &str) -> Response {
        let message = message.to_lowercase();

        if message.contains("help") {
            return Response::Text(
                "I'm here to help! You can ask me about:\n\n\
                 **Data Insights:**\n\
                 - 'Show me top 5 HCOs with highest ghost patients'\n\
                 - 'Show contract templates'\n\
                 - 'What's the expected rebate for 12-month survival?'\n\
                 - 'Patient statistics' or 'Show patient demographics'\n\
                 - 'How many patients had toxicity events?'\n\n\
                 **Dashboard Features:**\n\
                 - Cohort analysis and metrics\n\
                 - Contract simulation\n\
                 - Ghost radar features"
                    .into(),
            );
        }

        if message.contains("dashboard") {
            return Response::Text(
                "The dashboard provides comprehensive analytics including cohort analysis, \
                 contract simulation, and ghost radar features. You can navigate between \
                 different sections using the sidebar."
                    .into(),
            );
        }

        if message.contains("cohort") {
            return Response::Text(
                "The Cohort Overview shows key metrics like retention rates, engagement \
                 scores, and user growth. You can filter by different time periods to \
                 analyze trends."
                    .into(),
            );
        }

        if message.contains("contract") && !message.contains("simulate") {
            return Response::Text(
                "The Contract Simulator allows you to model different contract scenarios \
                 and see projected outcomes. You can ask me 'show contract templates' or \
                 'what's the expected rebate for 12-month survival?'"
                    .into(),
            );
        }

        if message.contains("ghost") || message.contains("radar") {
            return Response::Text(
                "Ghost Radar helps identify inactive or at-risk users. It uses advanced \
                 analytics to detect patterns that might indicate user churn."
                    .into(),
            );
        }

        if message.contains("hello") || message.contains("hi") {
            return Response::Text("Hello! How can I assist you today?".into());
        }

        if message.contains("thank") {
            return Response::Text(
                "You're welcome! Feel free to ask if you need anything else.".into(),
            );
        }

        Response::Text(
            "I understand. Is there anything specific you'd like to know? You can ask me:\n\
             - 'Show me top 5 HCOs with highest ghost patients'\n\
             - 'Show contract templates'\n\
             - 'What's the expected rebate for 12-month survival?'\n\
             - 'Patient statistics' or 'How many patients had toxicity?'\n\
             - Or ask about dashboard features"
                .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_replies() {
        let handler = GeneralHandler::new();

        assert!(handler.reply("help").first().contains("Data Insights"));
        assert!(handler.reply("hello").first().contains("How can I assist"));
        assert!(handler.reply("thanks a lot").first().contains("welcome"));
        assert!(handler
            .reply("tell me about the dashboard")
            .first()
            .contains("sidebar"));
    }

    #[test]
    fn test_default_reply() {
        let handler = GeneralHandler::new();
        assert!(handler
            .reply("completely unrelated text")
            .first()
            .starts_with("I understand."));
    }
}
