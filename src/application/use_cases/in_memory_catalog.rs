//! In-memory catalog used by the use case tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::entities::catalog::{
    AccessibilityPatch, Course, Discipline, Instructor, Lecture, NewDiscipline, NewLecture,
    NewOffering, Offering,
};
use crate::domain::repositories::catalog_repository::{
    CatalogRepository, StoreError, StoreResult,
};

#[derive(Default)]
struct CatalogState {
    next_id: i64,
    courses: Vec<Course>,
    disciplines: Vec<Discipline>,
    links: Vec<(i64, i64)>,
    instructors: Vec<Instructor>,
    design_instructors: Vec<Instructor>,
    offerings: Vec<Offering>,
    lectures: Vec<Lecture>,
}

impl CatalogState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-backed catalog without unit support
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
    fail_lecture_create: Mutex<Option<StoreError>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(&self, name: &str) -> Course {
        let mut state = self.state.lock().unwrap();
        let course = Course {
            id: state.next_id(),
            name: name.to_string(),
            axis: "Exatas".to_string(),
        };
        state.courses.push(course.clone());
        course
    }

    pub fn add_discipline(&self, code: &str) -> Discipline {
        let mut state = self.state.lock().unwrap();
        let discipline = Discipline {
            id: state.next_id(),
            code: code.to_string(),
            name: format!("Disciplina {}", code),
            credit_hours: 60,
        };
        state.disciplines.push(discipline.clone());
        discipline
    }

    pub fn add_instructor(&self, name: &str) -> Instructor {
        let mut state = self.state.lock().unwrap();
        let instructor = Instructor {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.instructors.push(instructor.clone());
        instructor
    }

    pub fn add_design_instructor(&self, name: &str) -> Instructor {
        let mut state = self.state.lock().unwrap();
        let instructor = Instructor {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.design_instructors.push(instructor.clone());
        instructor
    }

    pub fn add_offering(&self, discipline_id: i64, year: i32, term: i32) -> Offering {
        let mut state = self.state.lock().unwrap();
        let offering = Offering {
            id: state.next_id(),
            discipline_id,
            year,
            operational_term: term,
            instructor_id: None,
            design_instructor_id: None,
            kind: Default::default(),
        };
        state.offerings.push(offering.clone());
        offering
    }

    pub fn add_lecture(&self, offering_id: i64, external_catalog_id: &str) -> Lecture {
        let mut state = self.state.lock().unwrap();
        let lecture = Lecture {
            id: state.next_id(),
            offering_id,
            week_number: 1,
            sequence_in_week: 1,
            title: format!("Aula {}", external_catalog_id),
            synopsis: None,
            external_catalog_id: Some(external_catalog_id.to_string()),
            duration_minutes: None,
            original_video_link: None,
            sign_language_link: None,
            audio_description_link: None,
            download_link: None,
            captions_available: false,
            slides_available: false,
            status: None,
        };
        state.lectures.push(lecture.clone());
        lecture
    }

    pub fn fail_next_lecture_create(&self, error: StoreError) {
        *self.fail_lecture_create.lock().unwrap() = Some(error);
    }

    pub fn disciplines(&self) -> Vec<Discipline> {
        self.state.lock().unwrap().disciplines.clone()
    }

    pub fn offerings(&self) -> Vec<Offering> {
        self.state.lock().unwrap().offerings.clone()
    }

    pub fn lectures(&self) -> Vec<Lecture> {
        self.state.lock().unwrap().lectures.clone()
    }

    pub fn links(&self) -> Vec<(i64, i64)> {
        self.state.lock().unwrap().links.clone()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_course(&self, course_id: i64) -> StoreResult<Option<Course>> {
        let state = self.state.lock().unwrap();
        Ok(state.courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn find_discipline_by_code(&self, code: &str) -> StoreResult<Option<Discipline>> {
        let state = self.state.lock().unwrap();
        Ok(state.disciplines.iter().find(|d| d.code == code).cloned())
    }

    async fn create_discipline(&self, discipline: &NewDiscipline) -> StoreResult<Discipline> {
        let mut state = self.state.lock().unwrap();
        if state.disciplines.iter().any(|d| d.code == discipline.code) {
            return Err(StoreError::Conflict("disciplines.code".to_string()));
        }
        let created = Discipline {
            id: state.next_id(),
            code: discipline.code.clone(),
            name: discipline.name.clone(),
            credit_hours: discipline.credit_hours,
        };
        state.disciplines.push(created.clone());
        Ok(created)
    }

    async fn link_discipline_to_course(
        &self,
        discipline_id: i64,
        course_id: i64,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.links.push((discipline_id, course_id));
        Ok(())
    }

    async fn find_instructor_by_name(&self, name: &str) -> StoreResult<Option<Instructor>> {
        let state = self.state.lock().unwrap();
        Ok(state.instructors.iter().find(|i| i.name == name).cloned())
    }

    async fn find_design_instructor_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<Instructor>> {
        let state = self.state.lock().unwrap();
        Ok(state.design_instructors.iter().find(|i| i.name == name).cloned())
    }

    async fn find_offering(
        &self,
        discipline_id: i64,
        year: i32,
        operational_term: i32,
    ) -> StoreResult<Option<Offering>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .offerings
            .iter()
            .find(|o| {
                o.discipline_id == discipline_id
                    && o.year == year
                    && o.operational_term == operational_term
            })
            .cloned())
    }

    async fn create_offering(&self, offering: &NewOffering) -> StoreResult<Offering> {
        let mut state = self.state.lock().unwrap();
        let exists = state.offerings.iter().any(|o| {
            o.discipline_id == offering.discipline_id
                && o.year == offering.year
                && o.operational_term == offering.operational_term
        });
        if exists {
            return Err(StoreError::Conflict("offerings natural key".to_string()));
        }
        let created = Offering {
            id: state.next_id(),
            discipline_id: offering.discipline_id,
            year: offering.year,
            operational_term: offering.operational_term,
            instructor_id: None,
            design_instructor_id: None,
            kind: offering.kind,
        };
        state.offerings.push(created.clone());
        Ok(created)
    }

    async fn assign_offering_staff(
        &self,
        offering_id: i64,
        instructor_id: Option<i64>,
        design_instructor_id: Option<i64>,
    ) -> StoreResult<Offering> {
        let mut state = self.state.lock().unwrap();
        let offering = state
            .offerings
            .iter_mut()
            .find(|o| o.id == offering_id)
            .ok_or_else(|| StoreError::Other(format!("offering {} not found", offering_id)))?;
        if instructor_id.is_some() {
            offering.instructor_id = instructor_id;
        }
        if design_instructor_id.is_some() {
            offering.design_instructor_id = design_instructor_id;
        }
        Ok(offering.clone())
    }

    async fn find_lectures_by_catalog_id(
        &self,
        external_catalog_id: &str,
    ) -> StoreResult<Vec<Lecture>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .lectures
            .iter()
            .filter(|l| l.external_catalog_id.as_deref() == Some(external_catalog_id))
            .cloned()
            .collect())
    }

    async fn create_lecture(&self, lecture: &NewLecture) -> StoreResult<Lecture> {
        if let Some(error) = self.fail_lecture_create.lock().unwrap().take() {
            return Err(error);
        }
        let mut state = self.state.lock().unwrap();
        let created = Lecture {
            id: state.next_id(),
            offering_id: lecture.offering_id,
            week_number: lecture.week_number,
            sequence_in_week: lecture.sequence_in_week,
            title: lecture.title.clone(),
            synopsis: lecture.synopsis.clone(),
            external_catalog_id: lecture.external_catalog_id.clone(),
            duration_minutes: lecture.duration_minutes,
            original_video_link: lecture.original_video_link.clone(),
            sign_language_link: None,
            audio_description_link: None,
            download_link: lecture.download_link.clone(),
            captions_available: false,
            slides_available: lecture.slides_available,
            status: lecture.status.clone(),
        };
        state.lectures.push(created.clone());
        Ok(created)
    }

    async fn update_lecture_accessibility(
        &self,
        lecture_id: i64,
        patch: &AccessibilityPatch,
    ) -> StoreResult<Lecture> {
        let mut state = self.state.lock().unwrap();
        let lecture = state
            .lectures
            .iter_mut()
            .find(|l| l.id == lecture_id)
            .ok_or_else(|| StoreError::Other(format!("lecture {} not found", lecture_id)))?;
        patch.apply_to(lecture);
        Ok(lecture.clone())
    }
}
