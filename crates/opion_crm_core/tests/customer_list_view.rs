//! Integration tests for the customer list pipeline.

use chrono::{Duration, Utc};
use opion_crm_core::{
    build_list_view, compute_stats, filter_by_status, ContactInfo, CustomerRecord,
    FairAttendance, ListQuery, Paginator, Role, StatusCategory, StatusFilter, Viewer,
};
use std::num::NonZeroUsize;
use uuid::Uuid;

fn record(company_id: Uuid, index: usize, assigned: Option<Uuid>) -> CustomerRecord {
    let created_at = Utc::now() - Duration::minutes(index as i64);
    let (attending_fair, notes) = match index % 4 {
        0 => (FairAttendance::Attending, None),
        1 => (FairAttendance::NotAttending, None),
        2 => (FairAttendance::Unset, Some("fiyat teklifi bekleniyor".to_string())),
        _ => (FairAttendance::Unset, None),
    };
    CustomerRecord {
        id: Uuid::new_v4(),
        company_id,
        name: format!("Firma {index:02}"),
        sector_id: None,
        country_id: None,
        contact: ContactInfo::default(),
        notes,
        attending_fair,
        assigned_user_id: assigned,
        last_contact_date: None,
        created_at,
        updated_at: created_at,
    }
}

/// 40 records, every fourth one assigned to `user_id`.
fn snapshot(company_id: Uuid, user_id: Uuid) -> Vec<CustomerRecord> {
    (0..40)
        .map(|i| {
            let assigned = (i % 4 == 0 || i == 2).then_some(user_id);
            record(company_id, i, assigned)
        })
        .collect()
}

fn page_size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn admin_sees_every_record_across_pages() {
    let company_id = Uuid::new_v4();
    let admin = Viewer::new(Uuid::new_v4(), Role::CompanyAdmin, Some(company_id));
    let records = snapshot(company_id, Uuid::new_v4());

    let query = ListQuery {
        page_size: page_size(25),
        ..Default::default()
    };
    let first = build_list_view(&records, &admin, &query);
    assert_eq!(first.rows.len(), 25);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.matching, 40);
    assert!(first.has_next && !first.has_previous);
    assert!(first.rows.iter().all(|row| row.permission.can_delete));

    let second = build_list_view(&records, &admin, &ListQuery { page: 2, ..query });
    assert_eq!(second.rows.len(), 15);
    assert!(!second.has_next && second.has_previous);
    assert_eq!(second.rows[0].record.name, "Firma 25");
}

#[test]
fn user_stats_are_scoped_but_total_is_not() {
    let company_id = Uuid::new_v4();
    let user = Viewer::new(Uuid::new_v4(), Role::CompanyUser, Some(company_id));
    let admin = Viewer::new(Uuid::new_v4(), Role::CompanyAdmin, Some(company_id));
    let records = snapshot(company_id, user.id);

    let user_stats = compute_stats(&records, &user);
    let admin_stats = compute_stats(&records, &admin);

    assert_eq!(user_stats.total, admin_stats.total);
    assert_eq!(admin_stats.scoped_total(), admin_stats.total);
    assert_eq!(user_stats.attending_fair, 10);
    assert_eq!(user_stats.under_discussion, 1);
    assert_eq!(user_stats.scoped_total(), 11);

    let all = filter_by_status(&records, StatusFilter::parse("all"), &user);
    assert_eq!(all.len(), records.len());
}

#[test]
fn user_rows_only_allow_editing_assigned_records() {
    let company_id = Uuid::new_v4();
    let user = Viewer::new(Uuid::new_v4(), Role::CompanyUser, Some(company_id));
    let records = snapshot(company_id, user.id);

    let page = build_list_view(
        &records,
        &user,
        &ListQuery {
            page_size: page_size(50),
            ..Default::default()
        },
    );
    assert_eq!(page.rows.len(), 40);
    for row in &page.rows {
        assert!(row.permission.can_view);
        assert!(!row.permission.can_delete);
        assert_eq!(row.permission.can_edit, row.record.is_assigned_to(user.id));
    }
}

#[test]
fn status_filter_change_reclamps_page() {
    let company_id = Uuid::new_v4();
    let admin = Viewer::new(Uuid::new_v4(), Role::CompanyAdmin, Some(company_id));
    let records = snapshot(company_id, Uuid::new_v4());

    let query = ListQuery {
        status: StatusFilter::Only(StatusCategory::UnderDiscussion),
        search: None,
        page: 4,
        page_size: page_size(5),
    };
    let page = build_list_view(&records, &admin, &query);

    assert_eq!(page.matching, 10);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.rows.len(), 5);
    assert!(page
        .rows
        .iter()
        .all(|row| row.status == StatusCategory::UnderDiscussion));
}

#[test]
fn unrecognized_filter_yields_an_empty_first_page() {
    let company_id = Uuid::new_v4();
    let admin = Viewer::new(Uuid::new_v4(), Role::CompanyAdmin, Some(company_id));
    let records = snapshot(company_id, Uuid::new_v4());

    let query = ListQuery {
        status: StatusFilter::parse("arsiv"),
        page: 3,
        ..Default::default()
    };
    let page = build_list_view(&records, &admin, &query);
    assert!(page.rows.is_empty());
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next && !page.has_previous);
    assert_eq!(page.stats.total, 40);
}

#[test]
fn search_narrows_rows_but_not_stats() {
    let company_id = Uuid::new_v4();
    let admin = Viewer::new(Uuid::new_v4(), Role::CompanyAdmin, Some(company_id));
    let records = snapshot(company_id, Uuid::new_v4());

    let query = ListQuery {
        search: Some("firma 1".to_string()),
        ..Default::default()
    };
    let page = build_list_view(&records, &admin, &query);
    assert_eq!(page.matching, 10);
    assert_eq!(page.stats.total, 40);
}

#[test]
fn outsider_gets_nothing_to_act_on() {
    let company_id = Uuid::new_v4();
    let super_admin = Viewer::new(Uuid::new_v4(), Role::SuperAdmin, Some(company_id));
    let records = snapshot(company_id, Uuid::new_v4());

    let page = build_list_view(&records, &super_admin, &ListQuery::default());
    assert_eq!(page.stats.scoped_total(), 0);
    assert!(page.rows.iter().all(|row| !row.permission.can_view));
}

#[test]
fn paginator_navigation_follows_shrinking_results() {
    let mut paginator = Paginator::new(page_size(25));
    paginator.set_item_count(80);
    paginator.go_to_page(4);
    paginator.next();
    assert_eq!(paginator.current_page(), 4);

    paginator.set_item_count(26);
    assert_eq!(paginator.current_page(), 2);
    paginator.previous();
    paginator.previous();
    assert_eq!(paginator.current_page(), 1);
}
