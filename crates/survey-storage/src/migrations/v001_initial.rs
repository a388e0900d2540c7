//! V001: uploaded files, respondents, question catalogs, responses.

pub const MIGRATION_SQL: &str = r#"
-- One row per uploaded workbook. Deleting it cascades to everything
-- loaded from it.
CREATE TABLE IF NOT EXISTS uploaded_files (
    file_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'pending',
    uploaded_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_uploaded_files_uploaded_at
    ON uploaded_files(uploaded_at);

-- Respondent ids are only unique within a file.
CREATE TABLE IF NOT EXISTS respondents (
    respondent_id TEXT NOT NULL,
    file_id INTEGER NOT NULL REFERENCES uploaded_files(file_id) ON DELETE CASCADE,
    department TEXT,
    gender TEXT,
    age_group TEXT,
    education_level TEXT,
    major TEXT,
    experience_innovation TEXT,
    experience_total TEXT,
    certifications TEXT,
    programming_skills TEXT,
    comments TEXT,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (respondent_id, file_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_respondents_file_department
    ON respondents(file_id, department);

-- Question catalogs are shared across files and upserted on survey_id.
CREATE TABLE IF NOT EXISTS oci_questions (
    survey_id TEXT PRIMARY KEY,
    question_category TEXT,
    question_text TEXT,
    created_at INTEGER NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS cgs_questions (
    survey_id TEXT PRIMARY KEY,
    question_category TEXT,
    question_text TEXT,
    created_at INTEGER NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS oci_responses (
    response_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES uploaded_files(file_id) ON DELETE CASCADE,
    respondent_id TEXT NOT NULL,
    survey_id TEXT NOT NULL REFERENCES oci_questions(survey_id),
    response INTEGER NOT NULL,
    response_meaning TEXT,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_oci_responses_file_survey
    ON oci_responses(file_id, survey_id);
CREATE INDEX IF NOT EXISTS idx_oci_responses_file_respondent
    ON oci_responses(file_id, respondent_id);

CREATE TABLE IF NOT EXISTS cgs_responses (
    response_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES uploaded_files(file_id) ON DELETE CASCADE,
    respondent_id TEXT NOT NULL,
    survey_id TEXT NOT NULL REFERENCES cgs_questions(survey_id),
    response INTEGER NOT NULL,
    response_meaning TEXT,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_cgs_responses_file_survey
    ON cgs_responses(file_id, survey_id);
CREATE INDEX IF NOT EXISTS idx_cgs_responses_file_respondent
    ON cgs_responses(file_id, respondent_id);
"#;
