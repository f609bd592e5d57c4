pub mod books;
pub mod categories;
pub mod read_books;
pub mod unique;
pub mod users;
