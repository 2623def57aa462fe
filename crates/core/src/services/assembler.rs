//! Page assembly: raw records to a finished connection.
//!
//! The assembler turns the page a data source returned into edges with
//! per-record cursors and computes the `PageInfo` flags, re-presenting
//! backward pages in display order.

use crate::models::{Connection, Cursor, Edge, PageInfo};
use crate::ports::QueryPlan;

use super::planner::{Direction, NormalizedArgs};

/// Assemble a fetched page into a connection.
///
/// Edges are built in fetched order, each cursor encoding
/// `plan.offset + index` in the plan's enumeration; a backward page is
/// then reversed into display order. The cursors keep their fetch-order
/// offsets so they stay valid boundaries for follow-up requests in the
/// same direction.
///
/// Without a total count the "more pages" signal is the full-page
/// heuristic: a source that returned exactly `limit` records probably
/// has more. With a count it is exact.
pub fn assemble<T>(
    records: Vec<T>,
    plan: &QueryPlan,
    normalized: &NormalizedArgs,
    total_count: Option<u64>,
) -> Connection<T> {
    let fetched = records.len() as u64;

    let mut edges: Vec<Edge<T>> = records
        .into_iter()
        .enumerate()
        .map(|(index, node)| Edge {
            cursor: Cursor::from_offset(plan.offset + index as u64),
            node,
        })
        .collect();

    if normalized.direction == Direction::Backward {
        edges.reverse();
    }

    let more_beyond_window = match total_count {
        Some(total) => plan.offset + fetched < total,
        None => plan.limit > 0 && fetched == u64::from(plan.limit),
    };
    let behind_window = plan.offset > 0;

    // The fetch window advances toward the tail of display order when
    // paginating forward, and toward the head when paginating backward.
    let (has_next_page, has_previous_page) = match normalized.direction {
        Direction::Forward => (more_beyond_window, behind_window),
        Direction::Backward => (behind_window, more_beyond_window),
    };

    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Connection {
        edges,
        page_info,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterBag, OrderDirection};

    fn forward_plan(limit: u32, offset: u64) -> (QueryPlan, NormalizedArgs) {
        (
            QueryPlan {
                limit,
                offset,
                order: OrderDirection::Desc,
                filters: FilterBag::new(),
            },
            NormalizedArgs {
                limit,
                direction: Direction::Forward,
                boundary: None,
            },
        )
    }

    fn backward_plan(limit: u32, offset: u64) -> (QueryPlan, NormalizedArgs) {
        (
            QueryPlan {
                limit,
                offset,
                order: OrderDirection::Asc,
                filters: FilterBag::new(),
            },
            NormalizedArgs {
                limit,
                direction: Direction::Backward,
                boundary: None,
            },
        )
    }

    #[test]
    fn test_assemble_forward_cursors_follow_offsets() {
        let (plan, normalized) = forward_plan(2, 3);
        let conn = assemble(vec!["D", "E"], &plan, &normalized, None);

        assert_eq!(conn.edges[0].cursor, Cursor::from_offset(3));
        assert_eq!(conn.edges[1].cursor, Cursor::from_offset(4));
        assert_eq!(conn.page_info.start_cursor, Some(Cursor::from_offset(3)));
        assert_eq!(conn.page_info.end_cursor, Some(Cursor::from_offset(4)));
    }

    // Test critique: une page arrière est re-présentée dans l'ordre d'affichage
    // mais ses cursors gardent leurs offsets d'énumération
    #[test]
    fn test_assemble_backward_reverses_into_display_order() {
        // La source a énuméré depuis la fin: [E, D]
        let (plan, normalized) = backward_plan(2, 0);
        let conn = assemble(vec!["E", "D"], &plan, &normalized, None);

        let nodes: Vec<_> = conn.edges.iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec!["D", "E"]);
        // E était en position 0 de l'énumération arrière
        assert_eq!(conn.edges[1].cursor, Cursor::from_offset(0));
        assert_eq!(conn.edges[0].cursor, Cursor::from_offset(1));
    }

    #[test]
    fn test_assemble_full_page_heuristic_without_count() {
        let (plan, normalized) = forward_plan(2, 0);

        // Page pleine: probablement d'autres résultats
        let full = assemble(vec!["A", "B"], &plan, &normalized, None);
        assert!(full.page_info.has_next_page);
        assert!(!full.page_info.has_previous_page);

        // Page courte: fin du jeu de résultats
        let short = assemble(vec!["A"], &plan, &normalized, None);
        assert!(!short.page_info.has_next_page);
    }

    // Test critique: avec un total connu, les indicateurs sont exacts même
    // quand la page est pleine pile à la fin
    #[test]
    fn test_assemble_count_makes_flags_exact() {
        let (plan, normalized) = forward_plan(2, 3);
        let conn = assemble(vec!["D", "E"], &plan, &normalized, Some(5));

        assert!(!conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);
        assert_eq!(conn.total_count, Some(5));
    }

    #[test]
    fn test_assemble_backward_flags() {
        // Fenêtre arrière décalée: il reste des éléments plus récents
        let (plan, normalized) = backward_plan(2, 2);
        let conn = assemble(vec!["C", "B"], &plan, &normalized, Some(5));

        assert!(conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);

        // Fenêtre arrière en bout de course
        let (plan, normalized) = backward_plan(2, 0);
        let conn = assemble(vec!["E", "D"], &plan, &normalized, Some(5));
        assert!(!conn.page_info.has_next_page);
        assert!(conn.page_info.has_previous_page);
    }

    #[test]
    fn test_assemble_empty_page() {
        let (plan, normalized) = forward_plan(2, 0);
        let conn: Connection<&str> = assemble(vec![], &plan, &normalized, None);

        assert!(conn.edges.is_empty());
        assert!(!conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
        assert_eq!(conn.page_info.start_cursor, None);
        assert_eq!(conn.page_info.end_cursor, None);
    }

    #[test]
    fn test_assemble_zero_limit_page() {
        let (plan, normalized) = forward_plan(0, 0);
        let conn: Connection<&str> = assemble(vec![], &plan, &normalized, Some(5));

        assert!(conn.edges.is_empty());
        // Le total permet quand même de signaler la suite
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }
}
