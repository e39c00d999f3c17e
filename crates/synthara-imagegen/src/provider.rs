pub(crate) mod openai;
