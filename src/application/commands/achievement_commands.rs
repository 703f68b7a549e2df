// src/application/commands/achievement_commands.rs
//
// Achievement Command Handlers

use crate::application::{
    dto::*,
    error_handling::{ErrorResponse, ToErrorResponse},
    state::AppState,
};
use crate::domain::achievement::DEFAULT_TRIVIA_POINTS;
use crate::domain::Activity;

fn parse_activity(dto: &RecordActivityDto) -> Result<Activity, ErrorResponse> {
    let activity = match dto.kind.as_str() {
        "added_to_my_list" => Activity::AddedToMyList,
        "removed_from_my_list" => Activity::RemovedFromMyList,
        "rated" => Activity::Rated,
        "reviewed" => Activity::Reviewed {
            genre_ids: dto.genre_ids.clone().unwrap_or_default(),
        },
        "search_filter_used" => Activity::SearchFilterUsed,
        "decade_searched" => Activity::DecadeSearched {
            decade: dto
                .decade
                .ok_or_else(|| ErrorResponse::validation("Missing decade".to_string()))?,
        },
        "trivia_answered" => Activity::TriviaAnswered {
            correct: dto
                .correct
                .ok_or_else(|| ErrorResponse::validation("Missing answer result".to_string()))?,
            points: dto.points.unwrap_or(DEFAULT_TRIVIA_POINTS),
        },
        other => {
            return Err(ErrorResponse::validation(format!(
                "Invalid activity kind: {}",
                other
            )))
        }
    };
    Ok(activity)
}

/// Record a user action; returns the achievements it unlocked
pub async fn record_activity(
    dto: RecordActivityDto,
    state: &AppState,
) -> Result<Vec<UnlockedAchievementDto>, ErrorResponse> {
    let activity = parse_activity(&dto)?;

    let unlocked = state
        .achievement_service
        .record_activity(&dto.user_id, activity)
        .to_error_response()?;

    Ok(unlocked.into_iter().map(UnlockedAchievementDto::from).collect())
}

/// Unlock anything the stored counters already earn
pub async fn sync_achievements(
    user_id: String,
    state: &AppState,
) -> Result<Vec<UnlockedAchievementDto>, ErrorResponse> {
    let unlocked = state
        .achievement_service
        .sync_achievements(&user_id)
        .to_error_response()?;

    Ok(unlocked.into_iter().map(UnlockedAchievementDto::from).collect())
}

pub async fn list_achievements(
    user_id: String,
    state: &AppState,
) -> Result<Vec<AchievementDto>, ErrorResponse> {
    let statuses = state
        .achievement_service
        .list_achievements(&user_id)
        .to_error_response()?;

    Ok(statuses.into_iter().map(AchievementDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;

    fn dto(kind: &str) -> RecordActivityDto {
        RecordActivityDto {
            user_id: "u1".to_string(),
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_simple_kinds() {
        assert_eq!(parse_activity(&dto("rated")).unwrap(), Activity::Rated);
        assert_eq!(
            parse_activity(&dto("reviewed")).unwrap(),
            Activity::Reviewed { genre_ids: vec![] }
        );
    }

    #[test]
    fn test_trivia_defaults_points() {
        let mut payload = dto("trivia_answered");
        payload.correct = Some(true);
        assert_eq!(parse_activity(&payload).unwrap(), Activity::trivia_answer(true));
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let err = parse_activity(&dto("decade_searched")).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);

        let err = parse_activity(&dto("watched")).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);
    }
}
