// Route handlers
//
// Public: GET /, GET /health, GET /blogs, GET /blogs/:id
// Basic auth: POST /blogs, PUT /blogs/:id, DELETE /blogs/:id, DELETE /testing/all-data
pub mod blogs;
pub mod root;
pub mod testing;
