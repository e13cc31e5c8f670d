//! File descriptor set for gRPC reflection
//!
//! Built in code from the hand-written message definitions so that
//! reflection works without a `protoc` step.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    MethodDescriptorProto, ServiceDescriptorProto,
};

use crate::Service;

fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

/// lowerCamelCase JSON name, as protoc would derive it
fn json_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn ping_file() -> FileDescriptorProto {
    let package = Service::Ping.package();

    FileDescriptorProto {
        name: Some("infrastructure/v1/ping.proto".to_string()),
        package: Some(package.to_string()),
        message_type: vec![
            message("PingRequest", vec![string_field("message", 1)]),
            message(
                "PingResponse",
                vec![string_field("message", 1), string_field("server_time", 2)],
            ),
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("PingService".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("Ping".to_string()),
                input_type: Some(format!(".{package}.PingRequest")),
                output_type: Some(format!(".{package}.PingResponse")),
                ..Default::default()
            }],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// Descriptor set covering every service in [`Service::ALL`].
pub fn file_descriptor_set() -> FileDescriptorSet {
    let file = Service::ALL
        .into_iter()
        .map(|service| match service {
            Service::Ping => ping_file(),
        })
        .collect();

    FileDescriptorSet { file }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_names_services() {
        let set = file_descriptor_set();
        let names: Vec<String> = set
            .file
            .iter()
            .flat_map(|f| {
                let package = f.package().to_string();
                f.service
                    .iter()
                    .map(move |s| format!("{}.{}", package, s.name()))
            })
            .collect();

        assert_eq!(names, vec![Service::Ping.full_name().to_string()]);
    }

    #[test]
    fn test_json_name() {
        assert_eq!(json_name("server_time"), "serverTime");
        assert_eq!(json_name("message"), "message");
    }
}
