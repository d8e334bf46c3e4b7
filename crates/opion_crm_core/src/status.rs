//! crates/opion_crm_core/src/status.rs
//!
//! Derives the fair-participation status of a customer record.
//! The status is never stored; it is recomputed from the record every time.

use crate::domain::{CustomerRecord, FairAttendance};

/// The four mutually exclusive status categories of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    AttendingFair,
    NotAttendingFair,
    UnderDiscussion,
    NotContacted,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 4] = [
        StatusCategory::AttendingFair,
        StatusCategory::NotAttendingFair,
        StatusCategory::UnderDiscussion,
        StatusCategory::NotContacted,
    ];

    /// Stable machine key, also accepted as a filter value.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCategory::AttendingFair => "attending_fair",
            StatusCategory::NotAttendingFair => "not_attending_fair",
            StatusCategory::UnderDiscussion => "under_discussion",
            StatusCategory::NotContacted => "not_contacted",
        }
    }

    /// Badge text shown on a customer card.
    pub fn label(self) -> &'static str {
        match self {
            StatusCategory::AttendingFair => "Fuara Katılacak",
            StatusCategory::NotAttendingFair => "Fuara Katılmayacak",
            StatusCategory::UnderDiscussion => "Görüşülüyor",
            StatusCategory::NotContacted => "İletişime Geçilmedi",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == key)
    }
}

/// Classifies a record. First match wins:
/// attending, not attending, then notes with visible text, then not contacted.
pub fn classify(record: &CustomerRecord) -> StatusCategory {
    match record.attending_fair {
        FairAttendance::Attending => StatusCategory::AttendingFair,
        FairAttendance::NotAttending => StatusCategory::NotAttendingFair,
        FairAttendance::Unset if has_notes(record) => StatusCategory::UnderDiscussion,
        FairAttendance::Unset => StatusCategory::NotContacted,
    }
}

fn has_notes(record: &CustomerRecord) -> bool {
    record
        .notes
        .as_deref()
        .is_some_and(|notes| !notes.trim().is_empty())
}

/// The status filter selected on a list view.
///
/// Only the exact value `all` selects the unscoped list. Anything else that is
/// not a status key, the empty string included, is `Unrecognized` and matches
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(StatusCategory),
    Unrecognized,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => StatusFilter::All,
            other => StatusCategory::from_key(other)
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::Unrecognized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::customer;

    #[test]
    fn attending_wins_over_notes() {
        let mut record = customer();
        record.attending_fair = FairAttendance::Attending;
        record.notes = Some("anything".to_string());
        assert_eq!(classify(&record), StatusCategory::AttendingFair);
    }

    #[test]
    fn not_attending_wins_over_notes() {
        let mut record = customer();
        record.attending_fair = FairAttendance::NotAttending;
        record.notes = Some("call back in May".to_string());
        assert_eq!(classify(&record), StatusCategory::NotAttendingFair);
    }

    #[test]
    fn unset_with_notes_is_under_discussion() {
        let mut record = customer();
        record.attending_fair = FairAttendance::from(None);
        record.notes = Some("follow up".to_string());
        assert_eq!(classify(&record), StatusCategory::UnderDiscussion);
    }

    #[test]
    fn whitespace_notes_count_as_empty() {
        let mut record = customer();
        record.notes = Some("  \n\t ".to_string());
        assert_eq!(classify(&record), StatusCategory::NotContacted);

        record.notes = None;
        assert_eq!(classify(&record), StatusCategory::NotContacted);
    }

    #[test]
    fn classification_table() {
        let cases = [
            (FairAttendance::Attending, None, StatusCategory::AttendingFair),
            (FairAttendance::Attending, Some("   "), StatusCategory::AttendingFair),
            (FairAttendance::NotAttending, None, StatusCategory::NotAttendingFair),
            (FairAttendance::NotAttending, Some("x"), StatusCategory::NotAttendingFair),
            (FairAttendance::Unset, Some("met at expo"), StatusCategory::UnderDiscussion),
            (FairAttendance::Unset, Some(""), StatusCategory::NotContacted),
            (FairAttendance::Unset, None, StatusCategory::NotContacted),
        ];

        for (fair, note, expected) in cases {
            let mut record = customer();
            record.attending_fair = fair;
            record.notes = note.map(str::to_string);
            assert_eq!(classify(&record), expected, "{:?} / {:?}", fair, note);
        }
    }

    #[test]
    fn filter_parse() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("under_discussion"),
            StatusFilter::Only(StatusCategory::UnderDiscussion)
        );
        assert_eq!(StatusFilter::parse("archived"), StatusFilter::Unrecognized);
    }

    #[test]
    fn only_exact_all_is_unscoped() {
        for value in ["", " ", " all ", "ALL", "All", " under_discussion"] {
            assert_eq!(StatusFilter::parse(value), StatusFilter::Unrecognized, "{:?}", value);
        }
    }
}
