pub mod z3_ext;
