/*!
 * Tests for timing allocation
 */

use hansub::app_config::TimingConfig;
use hansub::timing::TimingAllocator;

fn chunks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Test the reference two-chunk scenario over ten seconds
#[test]
fn test_allocate_withTwoKoreanChunks_shouldSpanZeroToTen() {
    let allocator = TimingAllocator::default();
    let entries = allocator.allocate(&chunks(&["첫 번째 자막", "두 번째 자막"]), 10.0);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].start_time_ms, 0);
    // 7 chars -> 1400ms each, 100ms gap after the first, scaled by 10000/2800
    assert_eq!(entries[0].end_time_ms, 4643);
    assert_eq!(entries[1].start_time_ms, 5000);
    assert_eq!(entries[1].end_time_ms, 10_000);
    assert_eq!(entries[1].text, "두 번째 자막");
}

/// Test that a custom reading speed changes proportions but not the total
#[test]
fn test_allocate_withCustomConfig_shouldStillHitTarget() {
    let config = TimingConfig {
        reading_speed_cpm: 600.0,
        min_duration_ms: 500,
        max_duration_ms: 3000,
        gap_ms: 50,
    };
    let allocator = TimingAllocator::new(config);
    let input = chunks(&["짧은 문장", "조금 더 긴 문장입니다", "아주 아주 아주 아주 긴 마지막 문장입니다"]);

    let entries = allocator.allocate(&input, 12.345);

    assert_eq!(entries.last().unwrap().end_time_ms, 12_345);
    assert_eq!(entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["sub_1", "sub_2", "sub_3"]);
    for pair in entries.windows(2) {
        assert!(pair[0].end_time_ms <= pair[1].start_time_ms);
        assert!(pair[0].duration_ms() <= pair[1].duration_ms());
    }
}

/// Test that newlines inside a chunk do not count as characters
#[test]
fn test_estimateDuration_shouldIgnoreNewlines() {
    let allocator = TimingAllocator::default();
    let flat = allocator.estimate_duration_ms(&"가".repeat(10));
    let wrapped = allocator.estimate_duration_ms(&format!("{}\n{}", "가".repeat(5), "가".repeat(5)));
    assert_eq!(flat, 2000);
    assert_eq!(flat, wrapped);
}

/// Test a very short target with many chunks keeps every interval valid
#[test]
fn test_allocate_withTinyTarget_shouldKeepPositiveDurations() {
    let allocator = TimingAllocator::default();
    let input: Vec<String> = (0..20).map(|i| format!("자막 {}", i)).collect();

    let entries = allocator.allocate(&input, 0.1);

    assert!(entries.iter().all(|e| e.end_time_ms > e.start_time_ms));
    for pair in entries.windows(2) {
        assert!(pair[0].end_time_ms <= pair[1].start_time_ms);
    }
}
