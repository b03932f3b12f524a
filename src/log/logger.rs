use crate::{
    error::MetaData,
    log::{LogMessage, Warning},
};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Collection of non-fatal problems detected while parsing or analysing
/// a document.
pub struct Logger {
    /// Non-fatal errors and incompatibilities.
    pub warnings: Vec<LogMessage>,
}

impl Logger {
    pub(crate) fn add_warning(&mut self, warning: Warning, meta_data: &MetaData) {
        self.warnings.push(LogMessage::new(warning, meta_data));
    }

    pub(crate) fn extend(&mut self, other: Logger) {
        self.warnings.extend(other.warnings);
    }

    /// Create an iterator over the logged messages.
    ///
    /// The iterator visits the messages in the order of their line numbers,
    /// regardless of the order in which they were detected.
    pub fn iter(&self) -> impl Iterator<Item = &LogMessage> {
        let mut messages = self.warnings.iter().collect::<Vec<_>>();
        messages.sort_by_key(|message| message.meta_data.line_index);

        messages.into_iter()
    }

    /// Whether any warnings have been logged.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterating_through_log_yields_warnings_in_line_index_order() {
        let mut logger = Logger::default();

        logger.add_warning(
            Warning::DuplicateKnotName {
                name: "second".to_string(),
            },
            &MetaData::from(4),
        );
        logger.add_warning(
            Warning::DuplicateKnotName {
                name: "first".to_string(),
            },
            &MetaData::from(1),
        );

        let lines = logger
            .iter()
            .map(|message| message.meta_data.line_index)
            .collect::<Vec<_>>();

        assert_eq!(&lines, &[1, 4]);
    }

    #[test]
    fn extending_a_logger_appends_all_messages_from_the_other() {
        let mut logger = Logger::default();
        let mut other = Logger::default();

        logger.add_warning(
            Warning::UnrecognizedSyntax {
                line: "???".to_string(),
            },
            &MetaData::from(0),
        );
        other.add_warning(
            Warning::UnknownDivertTarget {
                target: "nowhere".to_string(),
            },
            &MetaData::from(1),
        );

        logger.extend(other);

        assert_eq!(logger.warnings.len(), 2);
    }
}
