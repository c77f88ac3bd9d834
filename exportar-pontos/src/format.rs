//! Formatação de valores numéricos para o arquivo de saída
//!
//! Cada coordenada (e cota, quando numérica) passa por uma política de
//! precisão e pela troca do ponto decimal pelo separador configurado.

use std::str::FromStr;

/// Política de precisão aplicada a cada valor exportado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionPolicy {
    /// Representação decimal padrão do f64, sem arredondamento
    Natural,
    /// Arredonda para o número de casas configurado (half-to-even, a regra
    /// do formatador padrão do Rust) e preenche com zeros
    Rounded,
    /// Trunca a parte fracionária no nível do texto, sem arredondar
    Truncated,
}

impl FromStr for PrecisionPolicy {
    type Err = std::convert::Infallible;

    /// Grafias desconhecidas caem na política natural
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "rounded" | "arredondada" => PrecisionPolicy::Rounded,
            "truncated" | "truncada" => PrecisionPolicy::Truncated,
            _ => PrecisionPolicy::Natural,
        })
    }
}

/// Formata um valor segundo a política, o número de casas e o separador.
///
/// A política truncada nunca arredonda: o texto da representação padrão é
/// cortado (ou completado com `'0'`) até `digits` casas. Um valor sem parte
/// fracionária vira `inteiro + separador + digits zeros`, e `digits = 0`
/// produz um separador final sem casas, como no comportamento de origem.
pub fn format_value(value: f64, policy: PrecisionPolicy, digits: usize, separator: char) -> String {
    match policy {
        PrecisionPolicy::Natural => replace_separator(&value.to_string(), separator),
        PrecisionPolicy::Rounded => replace_separator(&format!("{value:.digits$}"), separator),
        PrecisionPolicy::Truncated => {
            let rendered = value.to_string();
            match rendered.split_once('.') {
                Some((integer, fraction)) => {
                    let fraction = &fraction[..fraction.len().min(digits)];
                    format!("{integer}{separator}{fraction:0<digits$}")
                }
                None => {
                    let zeros = "0".repeat(digits);
                    format!("{rendered}{separator}{zeros}")
                }
            }
        }
    }
}

fn replace_separator(rendered: &str, separator: char) -> String {
    if separator == '.' {
        rendered.to_string()
    } else {
        rendered.replace('.', &separator.to_string())
    }
}
