mod artifact;
mod controller;
mod support;
mod timer;
