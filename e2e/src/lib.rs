#[cfg(test)]
mod body_limit;
#[cfg(test)]
mod http_post;
#[cfg(test)]
mod routing;

pub mod testkit;
