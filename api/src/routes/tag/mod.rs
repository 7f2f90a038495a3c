pub mod tag_route;
