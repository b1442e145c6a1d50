//! Download statistics tracking.

/// Per-course download statistics.
#[derive(Debug, Default)]
pub struct CourseStats {
    pub course_name: String,
    pub videos: u64,
    pub attachments: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl CourseStats {
    pub fn new(course_name: String) -> Self {
        Self {
            course_name,
            ..Default::default()
        }
    }
}

/// Whole-run statistics across courses.
#[derive(Debug, Default)]
pub struct RunStats {
    pub videos: u64,
    pub attachments: u64,
    pub skipped: u64,
    pub failed: u64,
    pub courses_failed: u64,
}

impl RunStats {
    pub fn add_course(&mut self, stats: &CourseStats) {
        self.videos += stats.videos;
        self.attachments += stats.attachments;
        self.skipped += stats.skipped;
        self.failed += stats.failed;
    }

    pub fn mark_course_failed(&mut self) {
        self.courses_failed += 1;
    }
}
