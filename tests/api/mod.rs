mod article_test;
mod calendar_test;
mod expand_test;
