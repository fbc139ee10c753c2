use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppResult, Validator};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Whole stars, 1 to 5.
    pub rating: i32,
    pub title: String,
    pub review_text: String,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> AppResult<()> {
        Validator::new()
            .check(
                (1..=5).contains(&self.rating),
                "rating",
                format!("Select a valid choice. {} is not one of the available choices.", self.rating),
            )
            .required(&self.title, "title")
            .max_len(&self.title, 200, "title")
            .required(&self.review_text, "review_text")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            rating,
            title: "Solid phone".into(),
            review_text: "Battery lasts two days.".into(),
        }
    }

    #[test]
    fn ratings_one_to_five_are_accepted() {
        for rating in 1..=5 {
            assert!(review(rating).validate().is_ok(), "rating {rating}");
        }
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        for rating in [-1, 0, 6, 10] {
            assert!(review(rating).validate().is_err(), "rating {rating}");
        }
    }

    #[test]
    fn title_and_body_are_required() {
        let request = CreateReviewRequest {
            rating: 4,
            title: String::new(),
            review_text: " ".into(),
        };
        match request.validate() {
            Err(crate::error::AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["title", "review_text"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
