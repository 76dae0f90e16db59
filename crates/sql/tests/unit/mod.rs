mod function_mapper;
mod identifiers;
