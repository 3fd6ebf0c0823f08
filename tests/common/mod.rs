#![allow(dead_code)]

use std::fs;
use tempfile::TempDir;

pub fn create_fixture_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("expected.txt");
    fs::write(&file_path, content).unwrap();
    (temp_dir, file_path)
}

/// Writes an executable script standing in for the terraform binary.
#[cfg(unix)]
pub fn create_fake_terraform(script: &str) -> (TempDir, std::path::PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("terraform");
    fs::write(&file_path, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&file_path, fs::Permissions::from_mode(0o755)).unwrap();
    (temp_dir, file_path)
}

pub const ALB_PLAN_OUTPUT: &str = r#"Refreshing Terraform state in-memory prior to plan...

------------------------------------------------------------------------

An execution plan has been generated and is shown below.
Resource actions are indicated with the following symbols:
  + create

Terraform will perform the following actions:

  + module.alb_test.aws_alb.alb
      id:                                    <computed>
      access_logs.#:                         "1"
      access_logs.0.enabled:                 "false"
      arn:                                   <computed>
      arn_suffix:                            <computed>
      dns_name:                              <computed>
      enable_deletion_protection:            "false"
      enable_http2:                          "true"
      idle_timeout:                          "60"
      internal:                              "true"
      ip_address_type:                       <computed>
      load_balancer_type:                    "application"
      name:                                  "super-nice-alb-name"
      security_groups.#:                     <computed>
      subnet_mapping.#:                      <computed>
      subnets.#:                             "3"
      subnets.2009589885:                    "subnet-ca4311ef"
      subnets.3117197332:                    "subnet-ba881221"
      subnets.416118645:                     "subnet-b46032ec"
      vpc_id:                                <computed>
      zone_id:                               <computed>

  + module.alb_test.aws_security_group.default
      id:                                    <computed>
      egress.#:                              "1"
      egress.482069346.cidr_blocks.#:        "1"
      egress.482069346.cidr_blocks.0:        "0.0.0.0/0"
      egress.482069346.description:          ""
      egress.482069346.from_port:            "0"
      egress.482069346.protocol:             "-1"
      egress.482069346.to_port:              "0"
      ingress.#:                             "2"
      ingress.2214680975.cidr_blocks.#:      "1"
      ingress.2214680975.from_port:          "80"
      ingress.2214680975.protocol:           "tcp"
      ingress.2214680975.to_port:            "80"
      ingress.2617001939.cidr_blocks.#:      "1"
      ingress.2617001939.from_port:          "443"
      ingress.2617001939.protocol:           "tcp"
      ingress.2617001939.to_port:            "443"
      revoke_rules_on_delete:                "false"
      vpc_id:                                "vpc-2f09a348"


Plan: 2 to add, 0 to change, 0 to destroy.
"#;

pub const ALB_FIXTURE: &str = r#"
      internal:                              "true"
      ip_address_type:                       <computed>
      load_balancer_type:                    "application"
      name:                                  "super-nice-alb-name"
"#;

pub const EGRESS_FIXTURE: &str = r#"
      egress.{ident}.cidr_blocks.#:        "1"
      egress.{ident}.cidr_blocks.0:        "0.0.0.0/0"
      egress.{ident}.description:          ""
      egress.{ident}.from_port:            "0"
      egress.{ident}.protocol:             "-1"
      egress.{ident}.to_port:              "0"
"#;

pub const HTTPS_INGRESS_FIXTURE: &str = r#"
      ingress.{ident}.cidr_blocks.#:      "1"
      ingress.{ident}.from_port:          "443"
      ingress.{ident}.protocol:           "tcp"
      ingress.{ident}.to_port:            "443"
"#;
