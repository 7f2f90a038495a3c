pub mod questions_route;
