pub mod student_data_store;

pub use student_data_store::LocalStudentDataStore;
