//! crates/opion_crm_core/src/stats.rs
//!
//! Per-status counts and status filtering over a snapshot of customer records.
//!
//! Two scopes are in play. The company-wide scope is every record handed in.
//! The viewer scope narrows a `company_user` to records assigned to them; a
//! `company_admin` keeps everything and any other role keeps nothing.
//! `total` and the "all" filter use the company-wide scope, the per-status
//! counts and the per-status filters use the viewer scope.

use crate::domain::{CustomerRecord, Role, Viewer};
use crate::status::{classify, StatusCategory, StatusFilter};

/// Counts shown in the stats bar of a customer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomerStats {
    pub total: usize,
    pub attending_fair: usize,
    pub not_attending_fair: usize,
    pub under_discussion: usize,
    pub not_contacted: usize,
}

impl CustomerStats {
    pub fn count_for(&self, status: StatusCategory) -> usize {
        match status {
            StatusCategory::AttendingFair => self.attending_fair,
            StatusCategory::NotAttendingFair => self.not_attending_fair,
            StatusCategory::UnderDiscussion => self.under_discussion,
            StatusCategory::NotContacted => self.not_contacted,
        }
    }

    /// Sum of the four per-status counts, i.e. the size of the viewer scope.
    pub fn scoped_total(&self) -> usize {
        StatusCategory::ALL
            .into_iter()
            .map(|status| self.count_for(status))
            .sum()
    }

    fn bump(&mut self, status: StatusCategory) {
        match status {
            StatusCategory::AttendingFair => self.attending_fair += 1,
            StatusCategory::NotAttendingFair => self.not_attending_fair += 1,
            StatusCategory::UnderDiscussion => self.under_discussion += 1,
            StatusCategory::NotContacted => self.not_contacted += 1,
        }
    }
}

/// Whether a record falls inside the viewer's aggregate scope.
pub fn in_viewer_scope(viewer: &Viewer, record: &CustomerRecord) -> bool {
    match viewer.role {
        Role::CompanyAdmin => true,
        Role::CompanyUser => record.is_assigned_to(viewer.id),
        _ => false,
    }
}

pub fn compute_stats(records: &[CustomerRecord], viewer: &Viewer) -> CustomerStats {
    let mut stats = CustomerStats {
        total: records.len(),
        ..Default::default()
    };
    records
        .iter()
        .filter(|record| in_viewer_scope(viewer, record))
        .for_each(|record| stats.bump(classify(record)));
    stats
}

/// Returns the records matching `filter`, in input order.
///
/// `All` is not scope-restricted, even for a company user: a company user can
/// see all company data in the unfiltered list.
pub fn filter_by_status<'a>(
    records: &'a [CustomerRecord],
    filter: StatusFilter,
    viewer: &Viewer,
) -> Vec<&'a CustomerRecord> {
    filter_records(records, filter, viewer)
}

/// Same as [`filter_by_status`] over any sequence of borrowed records.
pub fn filter_records<'a, I>(records: I, filter: StatusFilter, viewer: &Viewer) -> Vec<&'a CustomerRecord>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    let records = records.into_iter();
    match filter {
        StatusFilter::All => records.collect(),
        StatusFilter::Only(status) => records
            .filter(|record| in_viewer_scope(viewer, record) && classify(record) == status)
            .collect(),
        StatusFilter::Unrecognized => Vec::new(),
    }
}

/// Case-insensitive substring search over name, phone and contact person.
/// A blank query keeps every record.
pub fn search<'a>(records: &'a [CustomerRecord], query: &str) -> Vec<&'a CustomerRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            let contains = |field: Option<&str>| {
                field.is_some_and(|value| value.to_lowercase().contains(&needle))
            };
            contains(Some(record.name.as_str()))
                || contains(record.contact.phone.as_deref())
                || contains(record.contact.contact_person.as_deref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FairAttendance;
    use crate::test_support::{customer, viewer};
    use uuid::Uuid;

    fn with_status(fair: FairAttendance, notes: Option<&str>, assigned: Option<Uuid>) -> CustomerRecord {
        let mut record = customer();
        record.attending_fair = fair;
        record.notes = notes.map(str::to_string);
        record.assigned_user_id = assigned;
        record
    }

    fn sample(user_id: Uuid) -> Vec<CustomerRecord> {
        vec![
            with_status(FairAttendance::Attending, None, Some(user_id)),
            with_status(FairAttendance::Attending, None, None),
            with_status(FairAttendance::NotAttending, None, Some(user_id)),
            with_status(FairAttendance::Unset, Some("follow up"), Some(Uuid::new_v4())),
            with_status(FairAttendance::Unset, Some("  "), Some(user_id)),
            with_status(FairAttendance::Unset, None, None),
        ]
    }

    #[test]
    fn admin_stats_partition_total() {
        let admin = viewer(Role::CompanyAdmin);
        let records = sample(Uuid::new_v4());
        let stats = compute_stats(&records, &admin);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.attending_fair, 2);
        assert_eq!(stats.not_attending_fair, 1);
        assert_eq!(stats.under_discussion, 1);
        assert_eq!(stats.not_contacted, 2);
        assert_eq!(stats.scoped_total(), stats.total);
    }

    #[test]
    fn user_stats_count_only_assigned_records() {
        let user = viewer(Role::CompanyUser);
        let admin = viewer(Role::CompanyAdmin);
        let records = sample(user.id);

        let user_stats = compute_stats(&records, &user);
        let admin_stats = compute_stats(&records, &admin);

        assert_eq!(user_stats.total, admin_stats.total);
        assert_eq!(user_stats.attending_fair, 1);
        assert_eq!(user_stats.not_attending_fair, 1);
        assert_eq!(user_stats.under_discussion, 0);
        assert_eq!(user_stats.not_contacted, 1);
        assert_eq!(user_stats.scoped_total(), 3);
        assert!(user_stats.scoped_total() < user_stats.total);
    }

    #[test]
    fn unknown_role_has_empty_scope() {
        let outsider = viewer(Role::Other("guest".to_string()));
        let records = sample(outsider.id);
        let stats = compute_stats(&records, &outsider);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.scoped_total(), 0);
    }

    #[test]
    fn all_filter_is_not_scoped() {
        let user = viewer(Role::CompanyUser);
        let records = sample(user.id);
        assert_eq!(filter_by_status(&records, StatusFilter::All, &user).len(), records.len());
    }

    #[test]
    fn status_filter_is_scoped() {
        let user = viewer(Role::CompanyUser);
        let admin = viewer(Role::CompanyAdmin);
        let records = sample(user.id);
        let attending = StatusFilter::Only(StatusCategory::AttendingFair);

        let for_user = filter_by_status(&records, attending, &user);
        assert_eq!(for_user.len(), 1);
        assert!(for_user[0].is_assigned_to(user.id));

        assert_eq!(filter_by_status(&records, attending, &admin).len(), 2);

        let discussed = StatusFilter::Only(StatusCategory::UnderDiscussion);
        assert!(filter_by_status(&records, discussed, &user).is_empty());
        assert_eq!(filter_by_status(&records, discussed, &admin).len(), 1);
    }

    #[test]
    fn unrecognized_filter_matches_nothing() {
        let admin = viewer(Role::CompanyAdmin);
        let records = sample(Uuid::new_v4());
        let filter = StatusFilter::parse("archived");
        assert!(filter_by_status(&records, filter, &admin).is_empty());
    }

    #[test]
    fn empty_filter_value_is_not_the_all_list() {
        let user = viewer(Role::CompanyUser);
        let records = vec![with_status(FairAttendance::Unset, None, None); 2];
        assert!(filter_by_status(&records, StatusFilter::parse(""), &user).is_empty());
        assert_eq!(filter_by_status(&records, StatusFilter::parse("all"), &user).len(), 2);
    }

    #[test]
    fn search_matches_name_phone_and_contact() {
        let mut a = customer();
        a.name = "ABC Teknoloji".to_string();
        let mut b = customer();
        b.name = "Deniz İnşaat".to_string();
        b.contact.phone = Some("+90 532 111 22 33".to_string());
        let mut c = customer();
        c.name = "Kuzey Sağlık".to_string();
        c.contact.contact_person = Some("Ayşe Yılmaz".to_string());
        let records = vec![a, b, c];

        assert_eq!(search(&records, "abc")[0].name, "ABC Teknoloji");
        assert_eq!(search(&records, "532")[0].name, "Deniz İnşaat");
        assert_eq!(search(&records, "ayşe")[0].name, "Kuzey Sağlık");
        assert!(search(&records, "zzz").is_empty());
        assert_eq!(search(&records, "   ").len(), 3);
    }
}
