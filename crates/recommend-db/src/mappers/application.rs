//! Application entity <-> model mapper

use recommend_core::entities::Application;
use recommend_core::value_objects::Snowflake;

use crate::models::ApplicationModel;

impl From<ApplicationModel> for Application {
    fn from(model: ApplicationModel) -> Self {
        Application {
            id: Snowflake::new(model.id),
            student_id: Snowflake::new(model.student_id),
            legal_name: model.legal_name,
            program_type: model.program_type,
            term: model.term,
            university_ids: model.university_ids,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
