use axum_delivery_api::ratings::{
    ReviewerCount, average_rating, good_review_percentage, reviewer_count,
};

#[test]
fn average_of_empty_set_is_zero() {
    assert_eq!(average_rating(&[]), 0.0);
}

#[test]
fn average_is_rounded_to_one_decimal() {
    assert_eq!(average_rating(&[5, 3, 4]), 4.0);
    assert_eq!(average_rating(&[5, 4]), 4.5);
    // 13 / 3 = 4.333... -> 4.3
    assert_eq!(average_rating(&[4, 4, 5]), 4.3);
    // 5 / 3 = 1.666... -> 1.7
    assert_eq!(average_rating(&[1, 2, 2]), 1.7);
}

#[test]
fn reviewer_count_is_exact_up_to_three() {
    assert_eq!(reviewer_count(0), ReviewerCount::Exact(0));
    assert_eq!(reviewer_count(1), ReviewerCount::Exact(1));
    assert_eq!(reviewer_count(3), ReviewerCount::Exact(3));
}

#[test]
fn reviewer_count_caps_at_four_and_above() {
    assert_eq!(reviewer_count(4), ReviewerCount::Capped);
    assert_eq!(reviewer_count(100), ReviewerCount::Capped);
}

#[test]
fn reviewer_count_serializes_as_number_or_label() {
    let exact = serde_json::to_value(reviewer_count(2)).unwrap();
    assert_eq!(exact, serde_json::json!(2));

    let capped = serde_json::to_value(reviewer_count(7)).unwrap();
    assert_eq!(capped, serde_json::json!("3+"));
}

#[test]
fn good_review_percentage_of_empty_set() {
    assert_eq!(good_review_percentage(&[]), "0%");
}

#[test]
fn good_review_percentage_counts_ratings_above_three() {
    assert_eq!(good_review_percentage(&[5, 4, 2, 1]), "50%");
    assert_eq!(good_review_percentage(&[5, 5, 5]), "100%");
    assert_eq!(good_review_percentage(&[1, 2, 3]), "0%");
    // A rating of exactly 3 is not a good review.
    assert_eq!(good_review_percentage(&[3, 4]), "50%");
    // 1 / 3 = 33.3... -> 33
    assert_eq!(good_review_percentage(&[5, 1, 1]), "33%");
}
