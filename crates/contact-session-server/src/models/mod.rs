pub mod session;

pub use session::{
    AddContactRequest, AddContactResponse, Contact, CreateSessionRequest,
    CreateSessionResponse, Session,
};
