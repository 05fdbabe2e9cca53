//! Integration tests for the paginator against a changing source.

use residence_admin::{PageState, Paginator};

/// Small deterministic generator so operation sequences stay reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn assert_in_range(state: &PageState) {
    assert!(state.max_page >= 1, "max_page below 1: {:?}", state);
    assert!(
        (1..=state.max_page).contains(&state.current_page),
        "page out of range: {:?}",
        state
    );
    assert_eq!(
        state.max_page,
        state.source_len.div_ceil(state.items_per_page).max(1)
    );
}

#[test]
fn test_walkthrough_with_shrinking_source() {
    let source: Vec<usize> = (0..23).collect();
    let mut paginator = Paginator::new(5).unwrap();

    assert_eq!(paginator.current_slice(&source), &[0, 1, 2, 3, 4]);
    assert_eq!(paginator.jump(99, source.len()), 5);
    assert_eq!(paginator.current_slice(&source), &[20, 21, 22]);
    assert_eq!(paginator.next(source.len()), 5);

    let narrowed = &source[..3];
    assert_eq!(paginator.current_slice(narrowed), &[0, 1, 2]);
    assert_eq!(paginator.state().current_page, 1);
    assert_eq!(paginator.state().max_page, 1);
}

#[test]
fn test_growing_source_keeps_page() {
    let mut paginator = Paginator::new(5).unwrap();
    paginator.jump(2, 10);
    paginator.observe(40);
    assert_eq!(paginator.current_page(), 2);
    assert_eq!(paginator.max_page(), 8);
}

#[test]
fn test_default_page_size() {
    let paginator = Paginator::default();
    assert_eq!(paginator.items_per_page(), Paginator::DEFAULT_ITEMS_PER_PAGE);
    assert_eq!(paginator.state().max_page, 1);
}

#[test]
fn test_page_stays_in_range_for_any_operation_sequence() {
    let mut rng = Lcg(2024);

    for round in 0..50 {
        let items_per_page = rng.next(7) as usize + 1;
        let mut paginator = Paginator::new(items_per_page).unwrap();
        let mut source: Vec<u64> = (0..rng.next(40)).collect();

        for _ in 0..100 {
            match rng.next(6) {
                0 => {
                    paginator.next(source.len());
                }
                1 => {
                    paginator.previous(source.len());
                }
                2 => {
                    let target = rng.next(30) as i64 - 10;
                    paginator.jump(target, source.len());
                }
                3 => {
                    source.truncate(rng.next(source.len() as u64 + 1) as usize);
                    paginator.observe(source.len());
                }
                4 => {
                    source.extend(0..rng.next(15));
                    paginator.observe(source.len());
                }
                _ => {
                    let slice = paginator.current_slice(&source);
                    assert!(slice.len() <= items_per_page);
                    if !source.is_empty() {
                        assert!(!slice.is_empty(), "round {} produced an empty page", round);
                    }
                }
            }
            assert_in_range(&paginator.state());
        }
    }
}

#[test]
fn test_slices_cover_source_exactly_once() {
    for len in [0usize, 1, 4, 5, 6, 23, 50] {
        let source: Vec<usize> = (0..len).collect();
        let mut paginator = Paginator::new(5).unwrap();
        let mut seen = Vec::new();

        for page in 1..=paginator.max_page_for(len) {
            paginator.jump(page as i64, len);
            seen.extend_from_slice(paginator.current_slice(&source));
        }

        assert_eq!(seen, source);
    }
}
