use crate::categorize::CategoryClassifier;
use crate::models::{IncomingMessage, Payment};

use super::amount::{looks_like_payment, AmountExtractor};
use super::describe::DescriptionGenerator;
use super::sender::is_trusted_sender;

/// What a single message turned into.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseOutcome {
    Payment(Payment),
    UntrustedSender,
    NoPaymentKeyword,
    NoAmount,
}

/// Turns one inbox message into a candidate payment, without touching any
/// state.
#[derive(Default)]
pub(crate) struct SmsParser {
    amounts: AmountExtractor,
    classifier: CategoryClassifier,
    describer: DescriptionGenerator,
}

impl SmsParser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn parse(&self, message: &IncomingMessage) -> ParseOutcome {
        if !is_trusted_sender(&message.sender) {
            return ParseOutcome::UntrustedSender;
        }
        if !looks_like_payment(&message.body) {
            return ParseOutcome::NoPaymentKeyword;
        }
        let Some(amount) = self.amounts.extract(&message.body) else {
            return ParseOutcome::NoAmount;
        };

        let category = self.classifier.classify(&message.body, &message.sender);
        let description = self
            .describer
            .describe(&message.body, &message.sender, amount);

        ParseOutcome::Payment(Payment::from_sms(
            amount,
            description,
            category,
            message.timestamp_ms,
        ))
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
