mod article_query_test;
mod db_connection_test;
mod lifecycle_test;
