// src/services/venta_service.rs

use std::collections::HashMap;

use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{
    common::error::{AppError, RegistroAsociado},
    db::{
        BeneficiarioRepository, ClienteRepository, CursoRepository, PagoRepository,
        ProgramacionRepository, VentaRepository,
    },
    models::commerce::{
        ActualizarVentaPayload, BeneficiarioConCliente, CrearVentaPayload, Pago, Venta,
        VentaDetalle,
    },
    models::parties::{Beneficiario, InfoCliente},
    models::scheduling::{Asistencia, ProgramacionClase},
    services::pago_service::atribuir_cliente,
};

// Siguiente código consecutivo a partir del último emitido (CI-0001,
// CI-0002, ...). Un código ilegible reinicia la serie con aviso.
pub fn siguiente_codigo(ultimo: Option<&str>) -> String {
    let siguiente = match ultimo {
        None => 1,
        Some(codigo) => match codigo.strip_prefix("CI-").and_then(|n| n.parse::<u32>().ok()) {
            Some(numero) => numero + 1,
            None => {
                tracing::warn!(codigo, "código de venta ilegible, se reinicia la serie");
                1
            }
        },
    };
    format!("CI-{siguiente:04}")
}

// Registros que bloquean el borrado de una venta, en la forma en que
// viajan dentro de `associatedRecords`.
fn registros_de_pagos(pagos: &[Pago]) -> Vec<RegistroAsociado> {
    pagos
        .iter()
        .map(|p| RegistroAsociado {
            id: p.id,
            descripcion: format!(
                "Pago del {} por {}",
                p.fecha_pago.format("%d/%m/%Y"),
                p.valor_total
            ),
        })
        .collect()
}

fn registros_de_clases(clases: &[ProgramacionClase]) -> Vec<RegistroAsociado> {
    clases
        .iter()
        .map(|c| RegistroAsociado {
            id: c.id,
            descripcion: format!("{} {} - {}", c.dia, c.hora_inicio, c.hora_fin),
        })
        .collect()
}

fn registros_de_asistencias(asistencias: &[Asistencia]) -> Vec<RegistroAsociado> {
    asistencias
        .iter()
        .map(|a| RegistroAsociado {
            id: a.id,
            descripcion: format!("Asistencia del {}", a.fecha),
        })
        .collect()
}

#[derive(Clone)]
pub struct VentaService {
    venta_repo: VentaRepository,
    beneficiario_repo: BeneficiarioRepository,
    cliente_repo: ClienteRepository,
    curso_repo: CursoRepository,
    pago_repo: PagoRepository,
    programacion_repo: ProgramacionRepository,
}

impl VentaService {
    pub fn new(
        venta_repo: VentaRepository,
        beneficiario_repo: BeneficiarioRepository,
        cliente_repo: ClienteRepository,
        curso_repo: CursoRepository,
        pago_repo: PagoRepository,
        programacion_repo: ProgramacionRepository,
    ) -> Self {
        Self {
            venta_repo,
            beneficiario_repo,
            cliente_repo,
            curso_repo,
            pago_repo,
            programacion_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<VentaDetalle>, AppError> {
        let ventas = self.venta_repo.listar().await?;
        self.armar_detalles(ventas).await
    }

    pub async fn buscar_detalle(&self, id: Uuid) -> Result<VentaDetalle, AppError> {
        let venta = self
            .venta_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Venta"))?;
        self.detalle_de(venta).await
    }

    pub async fn proximo_codigo(&self) -> Result<String, AppError> {
        let ultimo = self.venta_repo.ultimo_codigo().await?;
        Ok(siguiente_codigo(ultimo.as_deref()))
    }

    pub async fn crear(&self, datos: &CrearVentaPayload) -> Result<VentaDetalle, AppError> {
        self.beneficiario_repo
            .buscar_por_id(datos.beneficiario_id)
            .await?
            .ok_or(AppError::NotFound("Beneficiario"))?;

        if let Some(curso_id) = datos.curso_id {
            self.curso_repo
                .buscar_por_id(curso_id)
                .await?
                .ok_or(AppError::NotFound("Curso"))?;
        }

        if datos.fecha_fin < datos.fecha_inicio {
            return Err(AppError::BadRequest(
                "La fecha de fin no puede ser anterior a la de inicio".into(),
            ));
        }

        let codigo = self.proximo_codigo().await?;
        let venta = self.venta_repo.crear(&codigo, datos).await?;
        self.detalle_de(venta).await
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarVentaPayload,
    ) -> Result<VentaDetalle, AppError> {
        if let Some(curso_id) = cambios.curso_id {
            self.curso_repo
                .buscar_por_id(curso_id)
                .await?
                .ok_or(AppError::NotFound("Curso"))?;
        }

        let venta = self
            .venta_repo
            .actualizar(id, cambios)
            .await?
            .ok_or(AppError::NotFound("Venta"))?;
        self.detalle_de(venta).await
    }

    pub async fn anular(&self, id: Uuid, motivo: Option<&str>) -> Result<VentaDetalle, AppError> {
        let venta = self
            .venta_repo
            .anular(id, motivo)
            .await?
            .ok_or(AppError::NotFound("Venta"))?;
        self.detalle_de(venta).await
    }

    // Pagos, clases y asistencias referencian la venta sin cascada; se
    // rechaza el borrado antes de chocar con la restricción, enumerando
    // los registros que lo bloquean.
    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        let pagos = self.pago_repo.listar_por_ventas(&[id]).await?;
        if !pagos.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje: "No se puede eliminar la venta porque tiene pagos registrados".into(),
                detalles: format!("La venta está asociada a {} pago(s)", pagos.len()),
                registros: registros_de_pagos(&pagos),
            });
        }

        let clases = self.programacion_repo.clases_de_venta(id).await?;
        if !clases.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje: "No se puede eliminar la venta porque tiene clases programadas".into(),
                detalles: format!("La venta está asociada a {} clase(s)", clases.len()),
                registros: registros_de_clases(&clases),
            });
        }

        let asistencias = self.programacion_repo.asistencias_de_venta(id).await?;
        if !asistencias.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje: "No se puede eliminar la venta porque tiene asistencias registradas"
                    .into(),
                detalles: format!(
                    "La venta está asociada a {} asistencia(s)",
                    asistencias.len()
                ),
                registros: registros_de_asistencias(&asistencias),
            });
        }

        if !self.venta_repo.eliminar(id).await? {
            return Err(AppError::NotFound("Venta"));
        }
        Ok(())
    }

    async fn detalle_de(&self, venta: Venta) -> Result<VentaDetalle, AppError> {
        let mut detalles = self.armar_detalles(vec![venta]).await?;
        detalles
            .pop()
            .ok_or_else(|| anyhow::anyhow!("beneficiario de la venta inexistente").into())
    }

    // Igual que en los pagos: beneficiarios por lote y atribución del
    // cliente de facturación de forma concurrente.
    async fn armar_detalles(&self, ventas: Vec<Venta>) -> Result<Vec<VentaDetalle>, AppError> {
        if ventas.is_empty() {
            return Ok(Vec::new());
        }

        let beneficiario_ids: Vec<Uuid> = ventas.iter().map(|v| v.beneficiario_id).collect();
        let beneficiarios: HashMap<Uuid, Beneficiario> = self
            .beneficiario_repo
            .listar_por_ids(&beneficiario_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let mut tareas = JoinSet::new();
        let mut entradas = Vec::with_capacity(ventas.len());

        for (indice, venta) in ventas.into_iter().enumerate() {
            let Some(beneficiario) = beneficiarios.get(&venta.beneficiario_id).cloned() else {
                tracing::warn!(venta_id = %venta.id, "venta sin beneficiario, se omite");
                continue;
            };

            let cliente_repo = self.cliente_repo.clone();
            let beneficiario_repo = self.beneficiario_repo.clone();
            let para_atribuir = beneficiario.clone();
            tareas.spawn(async move {
                (
                    indice,
                    atribuir_cliente(cliente_repo, beneficiario_repo, para_atribuir).await,
                )
            });

            entradas.push((indice, venta, beneficiario));
        }

        let mut atribuciones: HashMap<usize, Option<InfoCliente>> = HashMap::new();
        while let Some(resultado) = tareas.join_next().await {
            let (indice, info) =
                resultado.map_err(|e| anyhow::anyhow!("falló la tarea de atribución: {e}"))?;
            atribuciones.insert(indice, info);
        }

        let detalles = entradas
            .into_iter()
            .map(|(indice, venta, beneficiario)| VentaDetalle {
                venta,
                beneficiario: BeneficiarioConCliente::nuevo(
                    beneficiario,
                    atribuciones.remove(&indice).flatten(),
                ),
            })
            .collect();

        Ok(detalles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_serie_empieza_en_uno() {
        assert_eq!(siguiente_codigo(None), "CI-0001");
    }

    #[test]
    fn incrementa_el_ultimo_codigo() {
        assert_eq!(siguiente_codigo(Some("CI-0007")), "CI-0008");
        assert_eq!(siguiente_codigo(Some("CI-0099")), "CI-0100");
    }

    #[test]
    fn no_pierde_digitos_mas_alla_de_la_serie_corta() {
        assert_eq!(siguiente_codigo(Some("CI-9999")), "CI-10000");
    }

    #[test]
    fn un_codigo_ilegible_reinicia_la_serie() {
        assert_eq!(siguiente_codigo(Some("VENTA-7")), "CI-0001");
        assert_eq!(siguiente_codigo(Some("CI-xx")), "CI-0001");
    }

    #[test]
    fn los_pagos_bloqueantes_se_enumeran_con_fecha_y_valor() {
        use chrono::{TimeZone, Utc};
        use rust_decimal::Decimal;

        use crate::models::commerce::{EstadoPago, MetodoPago};

        let pago = Pago {
            id: Uuid::new_v4(),
            venta_id: Uuid::new_v4(),
            metodo_pago: MetodoPago::Efectivo,
            fecha_pago: Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap(),
            estado: EstadoPago::Completado,
            valor_total: Decimal::new(125_000, 0),
            descripcion: None,
            numero_transaccion: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let registros = registros_de_pagos(&[pago.clone()]);
        assert_eq!(registros.len(), 1);
        assert_eq!(registros[0].id, pago.id);
        assert_eq!(registros[0].descripcion, "Pago del 15/03/2026 por 125000");
    }

    #[test]
    fn las_clases_y_asistencias_bloqueantes_se_describen() {
        use chrono::{NaiveDate, Utc};

        use crate::models::scheduling::{EstadoAsistencia, EstadoProgramacionClase};

        let clase = ProgramacionClase {
            id: Uuid::new_v4(),
            programacion_profesor_id: Uuid::new_v4(),
            venta_id: Some(Uuid::new_v4()),
            dia: "lunes".into(),
            hora_inicio: "14:00".into(),
            hora_fin: "15:00".into(),
            especialidad: "Piano".into(),
            estado: EstadoProgramacionClase::Programada,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let registros = registros_de_clases(&[clase.clone()]);
        assert_eq!(registros[0].id, clase.id);
        assert_eq!(registros[0].descripcion, "lunes 14:00 - 15:00");

        let asistencia = Asistencia {
            id: Uuid::new_v4(),
            venta_id: Uuid::new_v4(),
            programacion_clase_id: clase.id,
            fecha: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            estado: EstadoAsistencia::Asistio,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let registros = registros_de_asistencias(&[asistencia.clone()]);
        assert_eq!(registros[0].id, asistencia.id);
        assert_eq!(registros[0].descripcion, "Asistencia del 2026-03-16");
    }
}
