//! Property tests for boundary resolution and planning.

use curriculum_split::segment::{resolve_boundary, PageRange, PlanNotice, Planner};
use curriculum_split::toc::{validate, PageRef};
use proptest::prelude::*;
use serde_json::{json, Value};

fn subject(title: &str, start: (u32, u32), end: (u32, u32)) -> Value {
    json!({
        "titulo": title,
        "start_page_pre_offset": start.0,
        "start_page_post_offset": start.1,
        "end_page_pre_offset": end.0,
        "end_page_post_offset": end.1,
    })
}

fn toc(subjects: Vec<Value>) -> curriculum_split::TableOfContents {
    let names: Vec<String> = (0..subjects.len()).map(|i| format!("S{i}")).collect();
    validate(&json!({
        "lista_materias": names,
        "offset": 0,
        "seccion_diseno": [],
        "competencias_claves": {
            "anexo_nombre": "Competencias clave",
            "start_page_pre_offset": 1,
            "start_page_post_offset": 1,
            "end_page_pre_offset": 1,
            "end_page_post_offset": 1,
        },
        "materias": subjects,
    }))
    .unwrap()
}

/// Strictly increasing boundaries `b0 < b1 < ... < bn`.
fn boundaries() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..40, 2..8).prop_map(|steps| {
        let mut page = 1;
        let mut out = vec![page];
        for step in steps {
            page += step;
            out.push(page);
        }
        out
    })
}

/// A candidate pair whose minimum is exactly `page`.
fn candidates(page: u32) -> impl Strategy<Value = (u32, u32)> {
    (0u32..15, any::<bool>()).prop_map(move |(noise, printed_low)| {
        if printed_low {
            (page, page + noise)
        } else {
            (page + noise, page)
        }
    })
}

/// A contiguous chain: subject `i` spans `[b_i, b_{i+1}]`, each boundary
/// given as a noisy candidate pair.
fn contiguous_chain() -> impl Strategy<Value = (Vec<u32>, Vec<Value>)> {
    boundaries().prop_flat_map(|bounds| {
        let pairs: Vec<_> = bounds.iter().map(|&b| candidates(b)).collect();
        (Just(bounds), pairs)
    })
    .prop_map(|(bounds, pairs)| {
        let subjects = pairs
            .windows(2)
            .enumerate()
            .map(|(i, w)| subject(&format!("S{i}"), w[0], w[1]))
            .collect();
        (bounds, subjects)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_resolution_is_min_and_idempotent(printed in 1u32..10_000, physical in 1u32..10_000) {
        let page = resolve_boundary(printed, physical);
        prop_assert_eq!(page, printed.min(physical));
        prop_assert_eq!(resolve_boundary(page, page), page);
        prop_assert_eq!(PageRef::new(printed, physical).resolve(), page);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_contiguous_subjects_overlap_at_most_one_page(
        (bounds, subjects) in contiguous_chain(),
        extra in 0u32..30,
    ) {
        let total = *bounds.last().unwrap() + extra;
        let plan = Planner::new().plan(&toc(subjects), total).unwrap();

        prop_assert!(!plan.is_suspect());
        let ranges: Vec<PageRange> = plan.subjects().values().map(|r| r.unwrap()).collect();
        for (i, w) in ranges.windows(2).enumerate() {
            prop_assert_eq!(w[0].overlap(&w[1]), 1);
            prop_assert_eq!(w[0].last(), bounds[i + 1]);
        }
    }

    #[test]
    fn prop_common_region_touches_subjects_only_at_boundaries(
        (bounds, subjects) in contiguous_chain(),
        extra in 0u32..30,
    ) {
        let total = *bounds.last().unwrap() + extra;
        let plan = Planner::new().plan(&toc(subjects), total).unwrap();
        let first = bounds[0];
        let last = *bounds.last().unwrap();

        for page in plan.common_pages() {
            prop_assert!(page < first || page >= last);
            prop_assert!(page >= 1 && page <= total);
        }
        // Every page is covered by the common region or some subject.
        for page in 1..=total {
            let in_subject = plan.subjects().values().flatten().any(|r| r.contains(page));
            prop_assert!(in_subject || plan.common_pages().contains(&page));
        }
    }

    #[test]
    fn prop_planned_ranges_stay_inside_document(
        (_bounds, subjects) in contiguous_chain(),
        total in 1u32..150,
    ) {
        let plan = Planner::new().plan(&toc(subjects), total).unwrap();

        for range in plan.subjects().values().flatten().chain(plan.common()) {
            prop_assert!(range.first() >= 1);
            prop_assert!(range.last() <= total);
        }
        for notice in plan.notices() {
            if let PlanNotice::Clipped { kept, .. } = notice {
                prop_assert!(kept.last() <= total);
            }
        }
    }
}
