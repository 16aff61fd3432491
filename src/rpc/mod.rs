pub mod dispatcher;
pub mod methods;
